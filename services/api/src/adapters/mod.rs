pub mod completion_llm;
pub mod cover;
pub mod db;
pub mod memory_store;
pub mod mock_llm;

pub use completion_llm::OpenAiCompletionAdapter;
pub use cover::SvgCoverAdapter;
pub use db::DbAdapter;
pub use memory_store::InMemoryLessonStore;
pub use mock_llm::MockCompletionAdapter;
