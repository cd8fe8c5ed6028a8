use std::cmp::Ordering;

use derive_more::{From, IsVariant};
use hashlink::LinkedHashMap;

/// Insertion-ordered map of caller supplied and derived fields.
pub type Metadata = LinkedHashMap<String, Value>;

/// A metadata value attached to a tree node.
#[derive(Debug, Clone, PartialEq, From, IsVariant)]
pub enum Value {
    #[from(skip)]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Metadata),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Metadata> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Total ordering used when sorting siblings.
    ///
    /// Values of the same kind compare naturally, integers and floats compare
    /// numerically with each other, and anything else falls back to a fixed
    /// rank per kind so that mixed collections still sort deterministically.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Value::Integer(a), Value::Float(b)) => compare_integer_to_float(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_integer_to_float(*b, *a).reverse(),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.compare(y))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Value::Map(a), Value::Map(b)) => a.len().cmp(&b.len()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::List(_) => 4,
            Value::Map(_) => 5,
        }
    }
}

/// Exact numeric comparison, without rounding `integer` to a float. NaNs
/// sort by sign, before or after every number.
fn compare_integer_to_float(integer: i64, float: f64) -> Ordering {
    // 2^63, the first float above i64::MAX
    const INTEGER_BOUND: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= INTEGER_BOUND {
        return Ordering::Less;
    }
    if float < -INTEGER_BOUND {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    integer.cmp(&(whole as i64)).then_with(|| {
        // Same integral part, the fraction decides.
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Value::from("a"), Value::from("b"), Ordering::Less)]
    #[case(Value::from("b"), Value::from("b"), Ordering::Equal)]
    #[case(Value::from(10_i64), Value::from(9_i64), Ordering::Greater)]
    #[case(Value::from(2_i64), Value::from(2.5), Ordering::Less)]
    #[case(Value::from(3.0), Value::from(3_i64), Ordering::Equal)]
    #[case(Value::from(false), Value::from(true), Ordering::Less)]
    #[case(Value::Null, Value::from("a"), Ordering::Less)]
    #[case(Value::from("1"), Value::from(1_i64), Ordering::Greater)]
    fn compare_orders_values(#[case] left: Value, #[case] right: Value, #[case] expected: Ordering) {
        assert_eq!(left.compare(&right), expected);
    }

    const TWO_POW_53: i64 = 1 << 53;

    #[rstest]
    #[case(Value::from(TWO_POW_53 + 1), Value::from(TWO_POW_53 as f64), Ordering::Greater)]
    #[case(Value::from(TWO_POW_53 as f64), Value::from(TWO_POW_53 + 1), Ordering::Less)]
    #[case(Value::from(TWO_POW_53), Value::from(TWO_POW_53 as f64), Ordering::Equal)]
    #[case(Value::from(i64::MAX), Value::from(9.3e18), Ordering::Less)]
    #[case(Value::from(i64::MIN), Value::from(f64::NEG_INFINITY), Ordering::Greater)]
    #[case(Value::from(-3_i64), Value::from(-2.5), Ordering::Less)]
    #[case(Value::from(-2_i64), Value::from(-2.5), Ordering::Greater)]
    #[case(Value::from(0_i64), Value::from(f64::NAN), Ordering::Less)]
    #[case(Value::from(-0.0), Value::from(0.0), Ordering::Equal)]
    fn numbers_compare_exactly(
        #[case] left: Value,
        #[case] right: Value,
        #[case] expected: Ordering,
    ) {
        assert_eq!(left.compare(&right), expected);
    }

    #[test]
    fn mixed_numbers_beyond_float_precision_sort_consistently() {
        let mut values: Vec<Value> = (0..100)
            .rev()
            .flat_map(|offset| {
                [
                    Value::from(TWO_POW_53 + offset),
                    Value::from((TWO_POW_53 + offset) as f64),
                ]
            })
            .collect();

        values.sort_by(Value::compare);

        for pair in values.windows(2) {
            assert_ne!(pair[0].compare(&pair[1]), Ordering::Greater);
        }
        let integers: Vec<i64> = values
            .iter()
            .filter_map(|value| match value {
                Value::Integer(integer) => Some(*integer),
                _ => None,
            })
            .collect();
        assert!(integers.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn lists_compare_element_wise_then_by_length() {
        let short = Value::List(vec![Value::from(1_i64)]);
        let long = Value::List(vec![Value::from(1_i64), Value::from(0_i64)]);
        let bigger = Value::List(vec![Value::from(2_i64)]);

        assert_eq!(short.compare(&long), Ordering::Less);
        assert_eq!(bigger.compare(&long), Ordering::Greater);
    }

    #[test]
    fn as_str_only_matches_strings() {
        assert_eq!(Value::from("title").as_str(), Some("title"));
        assert_eq!(Value::from(1_i64).as_str(), None);
        assert!(Value::Null.is_null());
    }
}
