use super::PersistentList;
use serde::{Deserialize, Serialize};

/// Index handling shared by every list mapping.
///
/// A persisted list stores each element's position in an index column. The
/// stored value is the position plus `index_base`, so a mapping with base `1`
/// persists the first element as `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSemantics {
    pub index_column: Option<String>,
    pub index_base: i64,
}

impl ListSemantics {
    pub fn new(index_column: Option<String>, index_base: i64) -> Self {
        Self {
            index_column,
            index_base,
        }
    }

    /// Returns the stored index of the first element equal to `element`.
    pub fn index_of<E: PartialEq>(&self, list: &[E], element: &E) -> Option<i64> {
        list.iter()
            .position(|candidate| candidate == element)
            .and_then(|position| self.to_index(position))
    }

    /// Pairs every element with the index it is stored under, in list order.
    ///
    /// Stops at the first element whose index does not fit in an `i64`.
    pub fn indexed<'a, E>(&self, list: &'a [E]) -> impl Iterator<Item = (i64, &'a E)> + 'a {
        let base = self.index_base;
        list.iter().enumerate().map_while(move |(position, element)| {
            let offset = i64::try_from(position).ok()?;
            Some((base.checked_add(offset)?, element))
        })
    }

    /// Looks an element up by its stored index.
    pub fn element_at<'a, E>(&self, list: &'a [E], index: i64) -> Option<&'a E> {
        let position = index.checked_sub(self.index_base)?;
        let position = usize::try_from(position).ok()?;
        list.get(position)
    }

    /// Brings `target` in line with `original` by clearing it and re-adding
    /// `original`'s elements in order.
    ///
    /// The target is only marked dirty when its contents actually change.
    pub fn replace_elements<E>(&self, original: &[E], target: &mut PersistentList<E>)
    where
        E: Clone + PartialEq,
    {
        if target.as_slice() == original {
            return;
        }
        target.clear();
        target.extend(original.iter().cloned());
    }

    fn to_index(&self, position: usize) -> Option<i64> {
        self.index_base.checked_add(i64::try_from(position).ok()?)
    }
}
