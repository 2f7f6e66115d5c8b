/// Resume position in a liked-you feed.
///
/// The wire form is the decimal row offset. Decoding is lenient: an absent, empty or
/// unparseable token starts from the first page instead of failing the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    offset: u64,
}

impl PageCursor {
    pub fn decode(token: Option<&str>) -> Self {
        token
            .and_then(|t| t.trim().parse::<u64>().ok())
            .map(|offset| Self { offset })
            .unwrap_or_default()
    }

    pub fn encode(&self) -> String {
        self.offset.to_string()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn advance(&self, rows: u32) -> Self {
        Self { offset: self.offset.saturating_add(rows as u64) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_token_is_first_page() {
        assert_eq!(PageCursor::decode(None).offset(), 0);
    }

    #[test]
    fn test_malformed_tokens_are_first_page() {
        for token in ["", "abc", "-10", "1.5", "10abc", "18446744073709551616"] {
            assert_eq!(PageCursor::decode(Some(token)).offset(), 0, "token {token:?}");
        }
    }

    #[test]
    fn test_issued_token_resumes_where_page_ended() {
        let next = PageCursor::default().advance(10);
        let token = next.encode();
        assert_eq!(PageCursor::decode(Some(token.as_str())), next);
        assert_eq!(PageCursor::decode(Some(token.as_str())).offset(), 10);
    }

    #[test]
    fn test_advance_saturates() {
        let cursor = PageCursor::decode(Some(u64::MAX.to_string().as_str())).advance(10);
        assert_eq!(cursor.offset(), u64::MAX);
    }
}
