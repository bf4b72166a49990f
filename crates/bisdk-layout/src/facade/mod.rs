//! Read-only facades over layout snapshots.
//!
//! A facade wraps one immutable snapshot ([`Arc<Layout<C>>`]) and exposes
//! navigation, predicates and collection traversal. Facades own their
//! snapshot, so they never borrow from a builder and stay valid after the
//! builder moves on. Collection facades materialize their element facades
//! lazily, once.
//!
//! [`Arc<Layout<C>>`]: std::sync::Arc

/// Traversal surface shared by [`RowsFacade`] and [`ColumnsFacade`].
///
/// Expects the collection type to provide `fn all(&self) -> &[$item]`.
macro_rules! collection_traversal {
    ($collection:ident, $item:ident) => {
        impl<C> $collection<C> {
            /// Iterator over the element facades, in order.
            pub fn iter(&self) -> std::slice::Iter<'_, $item<C>> {
                self.all().iter()
            }

            #[must_use]
            pub fn count(&self) -> usize {
                self.all().len()
            }

            pub fn map<T>(&self, f: impl FnMut(&$item<C>) -> T) -> Vec<T> {
                self.iter().map(f).collect()
            }

            pub fn flat_map<T, I>(&self, f: impl FnMut(&$item<C>) -> I) -> Vec<T>
            where
                I: IntoIterator<Item = T>,
            {
                self.iter().flat_map(f).collect()
            }

            pub fn reduce<A>(&self, init: A, f: impl FnMut(A, &$item<C>) -> A) -> A {
                self.iter().fold(init, f)
            }

            /// First element matching the predicate.
            pub fn find(&self, mut pred: impl FnMut(&$item<C>) -> bool) -> Option<$item<C>> {
                self.iter().find(|item| pred(item)).cloned()
            }

            pub fn find_index(&self, pred: impl FnMut(&$item<C>) -> bool) -> Option<usize> {
                self.iter().position(pred)
            }

            pub fn every(&self, pred: impl FnMut(&$item<C>) -> bool) -> bool {
                self.iter().all(pred)
            }

            pub fn some(&self, pred: impl FnMut(&$item<C>) -> bool) -> bool {
                self.iter().any(pred)
            }

            pub fn filter(&self, mut pred: impl FnMut(&$item<C>) -> bool) -> Vec<$item<C>> {
                self.iter().filter(|item| pred(item)).cloned().collect()
            }
        }

        impl<'a, C> IntoIterator for &'a $collection<C> {
            type Item = &'a $item<C>;
            type IntoIter = std::slice::Iter<'a, $item<C>>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }
    };
}

mod cache;
mod columns;
mod layout;
mod rows;

pub use cache::ColumnFacadeCache;
pub use columns::{ColumnFacade, ColumnsFacade};
pub use layout::LayoutFacade;
pub use rows::{RowFacade, RowsFacade};
