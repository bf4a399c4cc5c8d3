//! Bounded-capacity chunking of an ordered sequence.

use std::{mem::take, num::NonZeroUsize};

/// One element of a chunked stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunked<T> {
    Item(T),
    Separator,
}

/// Split `items` into runs of at most `capacity` elements.
///
/// A `Separator` is placed between consecutive runs, never after the last
/// one. Item order is untouched.
pub fn chunk_with_separators<T>(
    items: impl IntoIterator<Item = T>,
    capacity: NonZeroUsize,
) -> Vec<Chunked<T>> {
    let items: Vec<T> = items.into_iter().collect();
    let total = items.len();
    let capacity = capacity.get();

    let mut stream = Vec::with_capacity(total + total / capacity);
    for (i, item) in items.into_iter().enumerate() {
        stream.push(Chunked::Item(item));
        let placed = i + 1;
        if placed % capacity == 0 && placed < total {
            stream.push(Chunked::Separator);
        }
    }
    stream
}

/// Group a separated stream back into runs.
pub fn split_at_separators<T>(stream: impl IntoIterator<Item = Chunked<T>>) -> Vec<Vec<T>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for element in stream {
        match element {
            Chunked::Item(item) => current.push(item),
            Chunked::Separator => runs.push(take(&mut current)),
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::{Chunked::{Item, Separator}, *};

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_uneven_split() {
        let stream = chunk_with_separators(1..=5, cap(2));
        assert_eq!(stream, vec![Item(1), Item(2), Separator, Item(3), Item(4), Separator, Item(5)]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_separator() {
        let stream = chunk_with_separators(1..=4, cap(2));
        assert_eq!(stream, vec![Item(1), Item(2), Separator, Item(3), Item(4)]);
        assert_ne!(stream.last(), Some(&Separator));
    }

    #[test]
    fn test_capacity_larger_than_input() {
        let stream = chunk_with_separators(["a", "b"], cap(500));
        assert_eq!(stream, vec![Item("a"), Item("b")]);
    }

    #[test]
    fn test_empty_input() {
        let stream = chunk_with_separators(Vec::<u8>::new(), cap(3));
        assert!(stream.is_empty());
        assert!(split_at_separators(stream).is_empty());
    }

    #[test]
    fn test_capacity_one() {
        let stream = chunk_with_separators(['x', 'y', 'z'], cap(1));
        assert_eq!(stream, vec![Item('x'), Separator, Item('y'), Separator, Item('z')]);
    }

    #[test]
    fn test_split_preserves_content() {
        let items: Vec<u32> = (0..1234).collect();
        let runs = split_at_separators(chunk_with_separators(items.clone(), cap(500)));

        assert_eq!(runs.iter().map(Vec::len).collect::<Vec<_>>(), vec![500, 500, 234]);
        assert_eq!(runs.concat(), items);
    }
}
