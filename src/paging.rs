/// Splits `items` into pages of `size` elements, the last page may be shorter.
///
/// A `size` of 0 is treated as 1 so every item always lands on a page.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items
        .chunks(size.max(1))
        .map(|page| page.to_vec())
        .collect()
}

/// Position of an in-page row within the flattened page set.
pub fn absolute_index(page: usize, page_size: usize, row: usize) -> usize {
    page * page_size + row
}

pub fn flatten<T: Clone>(pages: &[Vec<T>]) -> Vec<T> {
    pages.iter().flatten().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_counts_and_order() {
        for n in 0..35 {
            let items: Vec<usize> = (0..n).collect();
            for size in 1..12 {
                let pages = chunk(&items, size);
                assert_eq!(pages.len(), n.div_ceil(size));
                assert_eq!(flatten(&pages), items);
                if let Some((last, full)) = pages.split_last() {
                    assert!(full.iter().all(|p| p.len() == size));
                    assert!(!last.is_empty() && last.len() <= size);
                }
            }
        }
    }

    #[test]
    fn twenty_five_items_make_three_pages() {
        let items: Vec<usize> = (0..25).collect();
        let sizes: Vec<usize> = chunk(&items, 10).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn zero_size_falls_back_to_single_items() {
        let pages = chunk(&[1, 2, 3], 0);
        assert_eq!(pages, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn absolute_index_uses_page_offset() {
        assert_eq!(absolute_index(0, 10, 4), 4);
        assert_eq!(absolute_index(2, 10, 3), 23);
    }
}
