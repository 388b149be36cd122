//! Homogeneous lists of values.
//!
//! A [`DataList`] is created for one element [`DataType`] and only ever holds
//! values of that variant. The binary format relies on this: a list writes its
//! element type once and then the bare payloads, with no per-element tag.

use crate::{DataType, DataValue, Error, Result};

/// An ordered list whose elements all share one declared [`DataType`].
///
/// # Examples
///
/// ```rust
/// use ubo::{DataList, DataType, DataValue};
///
/// let mut list = DataList::new(DataType::Short);
/// list.push(DataValue::Short(1)).unwrap();
/// list.push(2i16).unwrap();
///
/// // Values of any other variant are rejected.
/// assert!(list.push(3i32).is_err());
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DataList {
    element_type: DataType,
    items: Vec<DataValue>,
}

impl DataList {
    /// Creates an empty list for elements of `element_type`.
    #[must_use]
    pub fn new(element_type: DataType) -> Self {
        DataList {
            element_type,
            items: Vec::new(),
        }
    }

    /// Creates an empty list with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(element_type: DataType, capacity: usize) -> Self {
        DataList {
            element_type,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Creates a list of `element_type` holding `values`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementMismatch`] for the first value of another variant.
    pub fn with_values(element_type: DataType, values: Vec<DataValue>) -> Result<Self> {
        for value in &values {
            check(element_type, value)?;
        }
        Ok(DataList {
            element_type,
            items: values,
        })
    }

    /// Creates a list typed after its first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for an empty vector, since the element type
    /// cannot be inferred, and [`Error::ElementMismatch`] for mixed variants.
    pub fn infer(values: Vec<DataValue>) -> Result<Self> {
        let element_type = values
            .first()
            .map(DataValue::data_type)
            .ok_or_else(|| Error::invalid_data("cannot infer the element type of an empty list"))?;
        DataList::with_values(element_type, values)
    }

    /// Returns the declared element type.
    #[inline]
    #[must_use]
    pub fn element_type(&self) -> DataType {
        self.element_type
    }

    /// Appends a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementMismatch`] if the value has another variant.
    pub fn push(&mut self, value: impl Into<DataValue>) -> Result<()> {
        let value = value.into();
        check(self.element_type, &value)?;
        self.items.push(value);
        Ok(())
    }

    /// Inserts a value at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementMismatch`] on a variant mismatch and
    /// [`Error::InvalidData`] if `index > len`.
    pub fn insert(&mut self, index: usize, value: impl Into<DataValue>) -> Result<()> {
        let value = value.into();
        check(self.element_type, &value)?;
        if index > self.items.len() {
            return Err(out_of_bounds(index, self.items.len()));
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Replaces the value at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementMismatch`] on a variant mismatch and
    /// [`Error::InvalidData`] if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: impl Into<DataValue>) -> Result<DataValue> {
        let value = value.into();
        check(self.element_type, &value)?;
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, len))?;
        Ok(std::mem::replace(slot, value))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// The reference allows in-place mutation of the element's payload (for
    /// example inserting into a nested map) but not replacing it with another
    /// variant; use [`DataList::set`] for that.
    pub fn get_mut(&mut self, index: usize) -> Option<ElementMut<'_>> {
        self.items.get_mut(index).map(ElementMut)
    }

    /// Removes and returns the element at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<DataValue> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataValue> {
        self.items.iter()
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[DataValue] {
        &self.items
    }
}

/// Mutable access to a list element that cannot change its variant.
#[derive(Debug)]
pub struct ElementMut<'a>(&'a mut DataValue);

impl std::ops::Deref for ElementMut<'_> {
    type Target = DataValue;

    fn deref(&self) -> &DataValue {
        self.0
    }
}

impl ElementMut<'_> {
    /// Returns the nested map, if the element is one.
    pub fn as_map_mut(&mut self) -> Option<&mut crate::DataMap> {
        self.0.as_map_mut()
    }

    /// Returns the nested list, if the element is one.
    pub fn as_list_mut(&mut self) -> Option<&mut DataList> {
        self.0.as_list_mut()
    }

    /// Replaces the element with a value of the same variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementMismatch`] if `value` has another variant.
    pub fn replace(&mut self, value: impl Into<DataValue>) -> Result<DataValue> {
        let value = value.into();
        check(self.0.data_type(), &value)?;
        Ok(std::mem::replace(self.0, value))
    }
}

impl<'a> IntoIterator for &'a DataList {
    type Item = &'a DataValue;
    type IntoIter = std::slice::Iter<'a, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for DataList {
    type Item = DataValue;
    type IntoIter = std::vec::IntoIter<DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

fn check(expected: DataType, value: &DataValue) -> Result<()> {
    let found = value.data_type();
    if found == expected {
        Ok(())
    } else {
        Err(Error::ElementMismatch { expected, found })
    }
}

fn out_of_bounds(index: usize, len: usize) -> Error {
    Error::invalid_data(format!("index {} out of bounds for list of length {}", index, len))
}
