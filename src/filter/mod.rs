mod criteria;

pub use criteria::FilterCriteria;
