pub mod access;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;
