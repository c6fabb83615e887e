mod batch_engine;
#[cfg(test)]
mod tests;

pub use batch_engine::BatchEngine;
