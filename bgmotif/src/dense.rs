//! Dense matrix storage with a constant number of columns.

use std::fmt::Debug;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::ops::Index;
use std::ops::IndexMut;
use std::slice::ChunksExact;
use std::slice::ChunksExactMut;

use typenum::marker_traits::NonZero;
use typenum::marker_traits::Unsigned;

// --- DenseMatrix -------------------------------------------------------------

/// A dense row-major matrix with a constant number of columns.
///
/// Weight matrices store one row per motif position and one column per
/// symbol of the alphabet.
#[derive(Clone, PartialEq)]
pub struct DenseMatrix<T: Default + Copy, C: Unsigned + NonZero> {
    data: Vec<T>,
    rows: usize,
    _columns: std::marker::PhantomData<C>,
}

impl<T: Default + Copy, C: Unsigned + NonZero> DenseMatrix<T, C> {
    /// Create a new matrix with the given number of rows.
    pub fn new(rows: usize) -> Self {
        Self {
            data: vec![T::default(); rows * C::USIZE],
            rows,
            _columns: std::marker::PhantomData,
        }
    }

    /// Create a new dense matrix from an iterable of rows.
    ///
    /// # Panics
    ///
    /// Panics if any of the rows does not have the number of elements
    /// corresponding to the dense matrix columns.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<[T]>,
    {
        let mut data = Vec::new();
        let mut n = 0;
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), C::USIZE, "row {} has invalid width", n);
            data.extend_from_slice(row);
            n += 1;
        }
        Self {
            data,
            rows: n,
            _columns: std::marker::PhantomData,
        }
    }

    /// The number of rows of the matrix.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Iterate over the rows of the matrix.
    #[inline]
    pub fn iter(&self) -> ChunksExact<'_, T> {
        self.data.chunks_exact(C::USIZE)
    }

    /// Returns an iterator that allows modifying each row.
    #[inline]
    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(C::USIZE)
    }

    /// Fill the entire matrix with a constant value.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T: Default + Copy + Debug, C: Unsigned + NonZero> Debug for DenseMatrix<T, C> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Default + Copy, C: Unsigned + NonZero> Index<usize> for DenseMatrix<T, C> {
    type Output = [T];
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        let row = C::USIZE * index;
        &self.data[row..row + C::USIZE]
    }
}

impl<T: Default + Copy, C: Unsigned + NonZero> IndexMut<usize> for DenseMatrix<T, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let row = C::USIZE * index;
        &mut self.data[row..row + C::USIZE]
    }
}

impl<'a, T: Default + Copy, C: Unsigned + NonZero> IntoIterator for &'a DenseMatrix<T, C> {
    type Item = &'a [T];
    type IntoIter = ChunksExact<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Default + Copy, C: Unsigned + NonZero> IntoIterator for &'a mut DenseMatrix<T, C> {
    type Item = &'a mut [T];
    type IntoIter = ChunksExactMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use typenum::consts::U4;

    use super::*;

    #[test]
    fn test_new() {
        let d = DenseMatrix::<f32, U4>::new(3);
        assert_eq!(d.rows(), 3);
        assert!(d.iter().all(|row| row == [0.0; 4]));
    }

    #[test]
    fn test_from_rows() {
        let d = DenseMatrix::<u8, U4>::from_rows([[1, 2, 3, 4], [5, 6, 7, 8]]);
        assert_eq!(d.rows(), 2);
        assert_eq!(&d[1], &[5, 6, 7, 8]);
        assert_eq!(d.iter().count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_from_rows_invalid_width() {
        DenseMatrix::<u8, U4>::from_rows([vec![1, 2, 3]]);
    }

    #[test]
    fn test_iter_mut() {
        let mut d = DenseMatrix::<u8, U4>::new(2);
        for (i, row) in d.iter_mut().enumerate() {
            row[i] = 1;
        }
        assert_eq!(&d[0], &[1, 0, 0, 0]);
        assert_eq!(&d[1], &[0, 1, 0, 0]);
        d.fill(9);
        assert_eq!(&d[1], &[9, 9, 9, 9]);
    }
}
