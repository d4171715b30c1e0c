pub mod refs;
pub mod spec;

#[cfg(test)]
mod tests;
