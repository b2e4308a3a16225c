pub mod address;
pub mod config;
pub mod error;
pub mod pattern;
pub mod random;
pub mod trace;

mod logger;

pub mod prelude {
    pub use crate::address::AddressRecord;
    pub use crate::config::{JobFile, TraceJob};
    pub use crate::error::{Result, TraceError};
    pub use crate::pattern::{
        generate_looping, generate_random, generate_random_seeded, generate_repeated,
        generate_sequential, PatternSpec,
    };
    pub use crate::trace::{read_trace, write_trace, TraceWriter, ADDRESS_HEADER};
}
