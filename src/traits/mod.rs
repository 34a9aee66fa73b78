mod comparator;
pub use comparator::{Comparator, FloatOrder, NaturalOrder, Reverse};
