mod reader;

pub use reader::{InputReader, MAX_FILE_SIZE, MAX_STDIN_SIZE};
