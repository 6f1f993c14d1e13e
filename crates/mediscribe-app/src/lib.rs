pub mod session;
pub mod wav_input;

pub use session::{ScribeSession, SessionSnapshot};
