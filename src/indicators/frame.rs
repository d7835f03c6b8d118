use indexmap::IndexMap;
use serde::Serialize;

//named indicator columns aligned with a price series
//column order is insertion order, which is also the export order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorFrame {
    len: usize,
    columns: IndexMap<&'static str, Vec<f64>>,
}

impl IndicatorFrame {
    pub fn new(len: usize) -> Self {
        IndicatorFrame {
            len,
            columns: IndexMap::new(),
        }
    }

    //adds or replaces a column, padding or truncating to the frame length
    pub fn insert(&mut self, name: &'static str, mut values: Vec<f64>) {
        values.resize(self.len, f64::NAN);
        self.columns.insert(name, values);
    }

    //value of a column at a bar, nan when the column or bar is missing
    pub fn value(&self, name: &str, index: usize) -> f64 {
        self.columns
            .get(name)
            .and_then(|col| col.get(index))
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.keys().copied()
    }

    //all (name, value) pairs for one bar
    pub fn row(&self, index: usize) -> Vec<(&'static str, f64)> {
        self.columns
            .iter()
            .map(|(name, col)| (*name, col.get(index).copied().unwrap_or(f64::NAN)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_are_undefined() {
        let mut frame = IndicatorFrame::new(3);
        frame.insert("sma", vec![1.0, 2.0]);
        assert_eq!(frame.value("sma", 1), 2.0);
        assert!(frame.value("sma", 2).is_nan());
        assert!(frame.value("rsi", 0).is_nan());
        assert!(frame.value("sma", 9).is_nan());
    }

    #[test]
    fn rows_follow_insertion_order() {
        let mut frame = IndicatorFrame::new(1);
        frame.insert("b", vec![2.0]);
        frame.insert("a", vec![1.0]);
        assert_eq!(frame.row(0), vec![("b", 2.0), ("a", 1.0)]);
        assert_eq!(frame.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
