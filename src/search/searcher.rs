use std::cmp::Ordering;

use super::store::{cosine_similarity, Index, SearchResult};

/// Rank chunks of `index` against `query`, optionally limited to one
/// document, and keep the best `top_k`.
///
/// Ties keep index order. Rows whose similarity is undefined (zero vectors)
/// score 0 and stay in the ranking.
pub fn rank(
    index: &Index,
    query: &[f32],
    document_id: Option<&str>,
    top_k: usize,
) -> Vec<SearchResult> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = index
        .iter()
        .enumerate()
        .filter(|(_, (chunk, _))| document_id.map_or(true, |id| chunk.document_id == id))
        .map(|(i, (_, embedding))| (i, cosine_similarity(embedding, query)))
        .collect();

    // sort_by is stable, which gives the insertion-order tie break
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);

    scored
        .into_iter()
        .map(|(i, similarity)| SearchResult::new(&index.chunks()[i], similarity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::store::Chunk;

    fn index(rows: &[(&str, &str, Vec<f32>)]) -> Index {
        let chunks = rows
            .iter()
            .map(|(doc, text, _)| Chunk::new(*doc, None, *text))
            .collect();
        let embeddings = rows.iter().map(|(_, _, e)| e.clone()).collect();
        Index::new(chunks, embeddings).unwrap()
    }

    fn sample() -> Index {
        index(&[
            ("A", "a0", vec![1.0, 0.0]),
            ("A", "a1", vec![0.0, 1.0]),
            ("B", "b0", vec![0.7, 0.7]),
            ("B", "b1", vec![-1.0, 0.0]),
        ])
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let results = rank(&sample(), &[1.0, 0.0], None, 10);
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a0", "b0", "a1", "b1"]);

        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        for r in &results {
            assert!((-1.0..=1.0).contains(&r.similarity));
        }
    }

    #[test]
    fn test_rank_truncates_to_top_k() {
        let results = rank(&sample(), &[1.0, 0.0], None, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "a0");
        assert!(rank(&sample(), &[1.0, 0.0], None, 0).is_empty());
    }

    #[test]
    fn test_rank_within_document() {
        let results = rank(&sample(), &[1.0, 0.0], Some("B"), 10);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.document_id == "B"));
        assert_eq!(results[0].text, "b0");
        assert!(rank(&sample(), &[1.0, 0.0], Some("C"), 10).is_empty());
    }

    #[test]
    fn test_rank_ties_keep_insertion_order() {
        let idx = index(&[
            ("A", "first", vec![1.0, 0.0]),
            ("A", "second", vec![2.0, 0.0]),
            ("A", "third", vec![0.5, 0.0]),
        ]);
        let results = rank(&idx, &[1.0, 0.0], None, 3);
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_zero_vectors_score_zero() {
        let idx = index(&[
            ("A", "zero", vec![0.0, 0.0]),
            ("A", "negative", vec![-1.0, 0.0]),
            ("A", "positive", vec![1.0, 0.0]),
        ]);

        let results = rank(&idx, &[1.0, 0.0], None, 3);
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["positive", "zero", "negative"]);
        assert_eq!(results[1].similarity, 0.0);

        let zero_query = rank(&idx, &[0.0, 0.0], None, 3);
        assert_eq!(zero_query.len(), 3);
        assert!(zero_query.iter().all(|r| r.similarity == 0.0));
        assert_eq!(zero_query[0].text, "zero");
    }

    #[test]
    fn test_rank_empty_index() {
        assert!(rank(&Index::default(), &[1.0], None, 5).is_empty());
    }
}
