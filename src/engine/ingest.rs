//! Splits one recognition event into final and interim segments.

use crate::engine::types::RecognitionEvent;

/// A final segment together with its absolute result index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalSegment<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Classified view of an event's unprocessed range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestedResults<'a> {
    /// Final segments in result order.
    pub finals: Vec<FinalSegment<'a>>,
    /// Text of the last interim segment in the range. Earlier interim
    /// segments of the same event are superseded.
    pub interim: Option<&'a str>,
}

impl IngestedResults<'_> {
    pub fn has_final(&self) -> bool {
        !self.finals.is_empty()
    }

    pub fn has_interim(&self) -> bool {
        self.interim.is_some()
    }
}

/// Scan `results[result_index..]`, ignoring blank segments.
///
/// An out-of-range `result_index` yields an empty view.
pub fn ingest(event: &RecognitionEvent) -> IngestedResults<'_> {
    let mut out = IngestedResults::default();
    let Some(range) = event.results.get(event.result_index..) else {
        return out;
    };

    for (offset, segment) in range.iter().enumerate() {
        let text = segment.text.trim();
        if text.is_empty() {
            continue;
        }
        if segment.is_final {
            out.finals.push(FinalSegment {
                index: event.result_index + offset,
                text,
            });
        } else {
            out.interim = Some(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::RecognitionSegment;

    #[test]
    fn test_classifies_final_and_interim() {
        let event = RecognitionEvent::new(
            0,
            vec![
                RecognitionSegment::final_text("hello"),
                RecognitionSegment::interim("wor"),
            ],
        );
        let ingested = ingest(&event);
        assert_eq!(
            ingested.finals,
            vec![FinalSegment {
                index: 0,
                text: "hello"
            }]
        );
        assert_eq!(ingested.interim, Some("wor"));
        assert!(ingested.has_final());
        assert!(ingested.has_interim());
    }

    #[test]
    fn test_last_interim_wins() {
        let event = RecognitionEvent::new(
            0,
            vec![
                RecognitionSegment::interim("first"),
                RecognitionSegment::interim("second"),
            ],
        );
        assert_eq!(ingest(&event).interim, Some("second"));
    }

    #[test]
    fn test_skips_processed_range() {
        let event = RecognitionEvent::new(
            1,
            vec![
                RecognitionSegment::final_text("already seen"),
                RecognitionSegment::final_text("new text"),
            ],
        );
        let ingested = ingest(&event);
        assert_eq!(ingested.finals.len(), 1);
        assert_eq!(ingested.finals[0].index, 1);
        assert_eq!(ingested.finals[0].text, "new text");
    }

    #[test]
    fn test_blank_segments_ignored() {
        let event = RecognitionEvent::new(
            0,
            vec![
                RecognitionSegment::final_text("   "),
                RecognitionSegment::interim(""),
            ],
        );
        let ingested = ingest(&event);
        assert!(!ingested.has_final());
        assert!(!ingested.has_interim());
    }

    #[test]
    fn test_out_of_range_index() {
        let event = RecognitionEvent::new(5, vec![RecognitionSegment::final_text("x")]);
        assert_eq!(ingest(&event), IngestedResults::default());
    }
}
