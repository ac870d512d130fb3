use crate::dom::snapshot::PageMetrics;
use crate::error::{Result, ScoutError};

/// Number of viewport-height chunks the page divides into (at least 1)
pub fn total_chunks(metrics: &PageMetrics) -> usize {
    if metrics.viewport_height <= 0.0 {
        return 1;
    }
    let chunks = (metrics.document_height / metrics.viewport_height).ceil();
    (chunks as usize).max(1)
}

/// All chunk indices for the page, top to bottom
pub fn chunk_list(metrics: &PageMetrics) -> Vec<usize> {
    (0..total_chunks(metrics)).collect()
}

/// Scroll offset of a chunk's top edge
pub fn chunk_offset(chunk: usize, metrics: &PageMetrics) -> f64 {
    chunk as f64 * metrics.viewport_height
}

/// Pick the unseen chunk whose top offset is nearest the current scroll
/// position. Ties resolve to the first unseen chunk in index order.
///
/// Returns the chosen chunk and the full chunk list. Fails with
/// [`ScoutError::NoChunksRemaining`] when every chunk has been seen.
pub fn pick_chunk(chunks_seen: &[usize], metrics: &PageMetrics) -> Result<(usize, Vec<usize>)> {
    let chunks = chunk_list(metrics);
    let remaining: Vec<usize> = chunks.iter().copied().filter(|chunk| !chunks_seen.contains(chunk)).collect();

    let mut closest: Option<usize> = None;
    for &chunk in &remaining {
        let distance = (metrics.scroll_y - chunk_offset(chunk, metrics)).abs();
        match closest {
            Some(best) if (metrics.scroll_y - chunk_offset(best, metrics)).abs() <= distance => {}
            _ => closest = Some(chunk),
        }
    }

    match closest {
        Some(chunk) => Ok((chunk, chunks)),
        None => Err(ScoutError::NoChunksRemaining { remaining }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(document_height: f64, viewport_height: f64, scroll_y: f64) -> PageMetrics {
        PageMetrics {
            viewport_width: 1280.0,
            viewport_height,
            scroll_x: 0.0,
            scroll_y,
            document_height,
        }
    }

    #[test]
    fn test_total_chunks_rounds_up() {
        assert_eq!(total_chunks(&metrics(2000.0, 720.0, 0.0)), 3);
        assert_eq!(total_chunks(&metrics(720.0, 720.0, 0.0)), 1);
        assert_eq!(total_chunks(&metrics(721.0, 720.0, 0.0)), 2);
        // An empty document still has one chunk
        assert_eq!(total_chunks(&metrics(0.0, 720.0, 0.0)), 1);
    }

    #[test]
    fn test_pick_chunk_prefers_nearest() {
        // Scrolled to the top: chunk 0 is nearest
        let (chunk, chunks) = pick_chunk(&[], &metrics(2000.0, 720.0, 0.0)).unwrap();
        assert_eq!(chunk, 0);
        assert_eq!(chunks, vec![0, 1, 2]);

        // Scrolled near the bottom: chunk 2 is nearest
        let (chunk, _) = pick_chunk(&[], &metrics(2000.0, 720.0, 1400.0)).unwrap();
        assert_eq!(chunk, 2);
    }

    #[test]
    fn test_pick_chunk_skips_seen() {
        // Scenario from the extraction contract: chunks 0 and 1 seen,
        // scroll sitting at chunk 2's offset
        let (chunk, chunks) = pick_chunk(&[0, 1], &metrics(2000.0, 720.0, 1440.0)).unwrap();
        assert_eq!(chunk, 2);
        assert_eq!(chunks.len(), 3);

        // Even when the scroll position is nearest a seen chunk
        let (chunk, _) = pick_chunk(&[0], &metrics(2000.0, 720.0, 0.0)).unwrap();
        assert_eq!(chunk, 1);
    }

    #[test]
    fn test_pick_chunk_tie_takes_first() {
        // scroll_y equidistant from chunk 0 (0) and chunk 1 (720)
        let (chunk, _) = pick_chunk(&[], &metrics(2000.0, 720.0, 360.0)).unwrap();
        assert_eq!(chunk, 0);
    }

    #[test]
    fn test_pick_chunk_exhausted() {
        let err = pick_chunk(&[0, 1, 2], &metrics(2000.0, 720.0, 0.0)).unwrap_err();
        match err {
            ScoutError::NoChunksRemaining { remaining } => assert!(remaining.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
