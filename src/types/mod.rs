mod amount;
mod errors;
#[cfg(test)]
mod tests;

pub use amount::Amount;
pub use errors::AmountError;

pub type RowIndex = usize;
pub type Generation = u64;
