pub mod fallback;
pub mod google;
pub mod prompt;
pub mod traits;
pub mod util;

// Re-exports for convenience.
pub use fallback::FallbackOracle;
pub use google::GeminiOracle;
pub use traits::AdvisoryOracle;
