mod input_sanitizer;

pub use input_sanitizer::InputSanitizer;
