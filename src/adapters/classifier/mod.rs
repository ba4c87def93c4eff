//! Intent classifier adapters.

mod gemini;
mod mock;

pub use gemini::{GeminiClassifier, GeminiClassifierConfig};
pub use mock::{MockIntentClassifier, RecordedCall};
