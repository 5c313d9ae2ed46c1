//! Lazy power-set and Cartesian-product enumerators.
//!
//! Both report their size without materialising anything, so callers can
//! compare against a ceiling before the first element is produced. Sizes are
//! `None` when they do not fit in a `u64`.

/// Every subset of an ordered collection, one at a time.
///
/// Subsets preserve the order of the underlying collection. The empty subset
/// comes first.
#[derive(Debug, Clone)]
pub struct PowerSet<'a, T> {
    items: &'a [T],
    /// Binary counter; bit `i` selects `items[i]`
    mask: Vec<bool>,
    exhausted: bool,
}

impl<'a, T> PowerSet<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            mask: vec![false; items.len()],
            exhausted: false,
        }
    }

    /// 2^N, or `None` if that does not fit in a `u64`.
    pub fn size(&self) -> Option<u64> {
        u32::try_from(self.items.len())
            .ok()
            .and_then(|n| 1u64.checked_shl(n))
    }

    fn advance(&mut self) {
        match self.mask.iter().position(|bit| !bit) {
            Some(first_clear) => {
                self.mask[..first_clear].fill(false);
                self.mask[first_clear] = true;
            }
            None => self.exhausted = true,
        }
    }
}

impl<'a, T> Iterator for PowerSet<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let subset = self
            .items
            .iter()
            .zip(&self.mask)
            .filter_map(|(item, &selected)| selected.then_some(item))
            .collect();
        self.advance();
        Some(subset)
    }
}

/// Cartesian product over axes of heterogeneous length.
///
/// An empty axis makes the whole product empty. Zero axes yield exactly one
/// empty tuple. The last axis varies fastest.
#[derive(Debug, Clone)]
pub struct CartesianProduct<'a, T> {
    axes: Vec<&'a [T]>,
    cursor: Vec<usize>,
    exhausted: bool,
}

impl<'a, T> CartesianProduct<'a, T> {
    pub fn new(axes: Vec<&'a [T]>) -> Self {
        let exhausted = axes.iter().any(|axis| axis.is_empty());
        let cursor = vec![0; axes.len()];
        Self {
            axes,
            cursor,
            exhausted,
        }
    }

    /// Product of the axis lengths, computed in O(axes).
    pub fn size(&self) -> Option<u64> {
        product_size(self.axes.iter().map(|axis| axis.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.size() == Some(0)
    }

    fn advance(&mut self) {
        for axis in (0..self.axes.len()).rev() {
            self.cursor[axis] += 1;
            if self.cursor[axis] < self.axes[axis].len() {
                return;
            }
            self.cursor[axis] = 0;
        }
        self.exhausted = true;
    }
}

impl<'a, T> Iterator for CartesianProduct<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let point = self
            .axes
            .iter()
            .zip(&self.cursor)
            .map(|(axis, &i)| &axis[i])
            .collect();
        self.advance();
        Some(point)
    }
}

/// Cartesian product where an empty axis contributes a `None` placeholder
/// instead of emptying the product.
///
/// If no axis offers a choice at all, the product is empty.
#[derive(Debug, Clone)]
pub struct PaddedProduct<'a, T> {
    inner: CartesianProduct<'a, T>,
    /// Per axis: does it contribute a choice
    present: Vec<bool>,
}

impl<'a, T> PaddedProduct<'a, T> {
    pub fn new(axes: Vec<&'a [T]>) -> Self {
        let present: Vec<bool> = axes.iter().map(|axis| !axis.is_empty()).collect();
        let mut inner =
            CartesianProduct::new(axes.into_iter().filter(|axis| !axis.is_empty()).collect());
        if !present.iter().any(|&p| p) {
            inner.exhausted = true;
        }
        Self { inner, present }
    }

    pub fn size(&self) -> Option<u64> {
        if self.present.iter().any(|&p| p) {
            self.inner.size()
        } else {
            Some(0)
        }
    }
}

impl<'a, T> Iterator for PaddedProduct<'a, T> {
    type Item = Vec<Option<&'a T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut choices = self.inner.next()?.into_iter();
        Some(
            self.present
                .iter()
                .map(|&present| if present { choices.next() } else { None })
                .collect(),
        )
    }
}

/// Product of lengths; 0 if any length is 0, `None` on overflow.
pub fn product_size(lengths: impl IntoIterator<Item = usize>) -> Option<u64> {
    let lengths: Vec<u64> = lengths.into_iter().map(|len| len as u64).collect();
    if lengths.contains(&0) {
        return Some(0);
    }
    lengths
        .into_iter()
        .try_fold(1u64, |acc, len| acc.checked_mul(len))
}
