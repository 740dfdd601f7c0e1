mod record_parser;
#[cfg(test)]
mod tests;

pub use record_parser::parse_lines;
