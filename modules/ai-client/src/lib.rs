pub mod openai;
pub mod traits;
pub mod util;

pub use openai::OpenAi;
pub use traits::{Agent, PromptBuilder};
pub use util::{strip_code_blocks, truncate_chars};
