mod emitter;

pub use emitter::*;
