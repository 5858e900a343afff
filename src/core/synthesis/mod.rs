//! Speech synthesis: black-box provider interface, locale lookup, and the
//! playback front-end for displayed translations.

pub mod base;
pub mod locale;
pub mod speaker;

pub use base::{SynthesisError, SynthesisProvider, SynthesisResult};
pub use locale::{DEFAULT_LOCALE, LOCALE_MAP, locale_for_language};
pub use speaker::{Speaker, strip_turn_label};
