use crate::{lexicon::Lexicon, tokenizer::tokenize, SentimentError};
use std::fmt;

pub const PRODUCT_ID_FIELD: usize = 1;
pub const BODY_FIELD: usize = 7;
pub const MIN_FIELDS: usize = BODY_FIELD + 1;

/// The fields of one tab-separated review line that classification reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub product_id: &'a str,
    pub body: &'a str,
}

impl<'a> Record<'a> {
    pub fn parse(line: &'a str) -> Result<Self, SentimentError> {
        let mut fields = line.split('\t');
        let product_id = fields.nth(PRODUCT_ID_FIELD);
        let body = fields.nth(BODY_FIELD - PRODUCT_ID_FIELD - 1);

        match (product_id, body) {
            (Some(""), Some(_)) => Err(SentimentError::MalformedRecord(
                "empty product id".to_owned(),
            )),
            (Some(product_id), Some(body)) => Ok(Self { product_id, body }),
            _ => Err(SentimentError::MalformedRecord(format!(
                "expected at least {} tab-separated fields, found {}",
                MIN_FIELDS,
                line.split('\t').count()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum SentimentCode {
    Positive = 1,
    Negative = -1,
    Neutral = 0,
    /// No lexicon word appeared at all.
    NoSignal = -2,
}

impl SentimentCode {
    pub fn value(self) -> i64 {
        i64::from(self as i8)
    }

    /// Counter name under which records with this code are tallied.
    pub fn counter(self) -> &'static str {
        match self {
            SentimentCode::Positive => "positive",
            SentimentCode::Negative => "negative",
            SentimentCode::Neutral => "neutral",
            SentimentCode::NoSignal => "no-signal",
        }
    }
}

impl fmt::Display for SentimentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Lexicon hits in one body. Every occurrence counts, and a word present in
/// both lexicons counts toward both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub positive: usize,
    pub negative: usize,
}

impl Tally {
    pub fn count(body: &str, positive: &Lexicon, negative: &Lexicon) -> Self {
        let mut tally = Self::default();
        for token in tokenize(body) {
            if positive.contains(&token) {
                tally.positive += 1;
            }
            if negative.contains(&token) {
                tally.negative += 1;
            }
        }
        tally
    }

    pub fn code(self) -> SentimentCode {
        // The zero check must come first: it separates "no opinion words"
        // from a tie.
        if self.positive + self.negative == 0 {
            SentimentCode::NoSignal
        } else if self.positive > self.negative {
            SentimentCode::Positive
        } else if self.positive < self.negative {
            SentimentCode::Negative
        } else {
            SentimentCode::Neutral
        }
    }
}

pub fn classify<'r>(
    record: &Record<'r>,
    positive: &Lexicon,
    negative: &Lexicon,
) -> (&'r str, SentimentCode) {
    let code = Tally::count(record.body, positive, negative).code();
    (record.product_id, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicons() -> (Lexicon, Lexicon) {
        (
            vec!["great", "good"].into_iter().collect(),
            vec!["bad"].into_iter().collect(),
        )
    }

    fn line(customer: &str, product: &str, body: &str) -> String {
        format!("{}\t{}\tR1\t5\t0\t0\tN\t{}", customer, product, body)
    }

    fn classify_line(line: &str) -> (String, SentimentCode) {
        let (positive, negative) = lexicons();
        let record = Record::parse(line).unwrap();
        let (key, code) = classify(&record, &positive, &negative);
        (key.to_owned(), code)
    }

    #[test]
    fn parse_record() {
        let line = line("u1", "p42", "this product is great");
        let record = Record::parse(&line).unwrap();
        assert_eq!(record.product_id, "p42");
        assert_eq!(record.body, "this product is great");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let line = format!("{}\textra\tfields", line("u1", "p1", "good"));
        assert_eq!(Record::parse(&line).unwrap().body, "good");
    }

    #[test]
    fn empty_body_is_valid() {
        let line = line("u1", "p1", "");
        assert_eq!(classify_line(&line), ("p1".to_owned(), SentimentCode::NoSignal));
    }

    #[test]
    fn too_few_fields() {
        for line in &["u1\tp42\tgreat", "", "a\tb\tc\td\te\tf\tg"] {
            assert!(matches!(
                Record::parse(line),
                Err(SentimentError::MalformedRecord(_))
            ));
        }
    }

    #[test]
    fn empty_product_id() {
        let line = line("u1", "", "great");
        assert!(matches!(
            Record::parse(&line),
            Err(SentimentError::MalformedRecord(_))
        ));
    }

    #[test]
    fn codes() {
        let cases = [
            ("this product is great and good", SentimentCode::Positive),
            ("bad bad experience", SentimentCode::Negative),
            ("the box arrived", SentimentCode::NoSignal),
            ("good bad", SentimentCode::Neutral),
            ("Great! But BAD, bad, bad.", SentimentCode::Negative),
            ("good good good bad bad", SentimentCode::Positive),
        ];
        for (body, expected) in cases.iter() {
            let (key, code) = classify_line(&line("u1", "pXX", body));
            assert_eq!(key, "pXX");
            assert_eq!(code, *expected, "body: {:?}", body);
        }
    }

    #[test]
    fn occurrences_not_distinct_words() {
        let (positive, negative) = lexicons();
        let tally = Tally::count("good good, GOOD! bad", &positive, &negative);
        assert_eq!(
            tally,
            Tally {
                positive: 3,
                negative: 1
            }
        );
    }

    #[test]
    fn word_in_both_lexicons() {
        let positive: Lexicon = vec!["fine"].into_iter().collect();
        let negative: Lexicon = vec!["fine", "bad"].into_iter().collect();
        let tally = Tally::count("fine", &positive, &negative);
        assert_eq!(
            tally,
            Tally {
                positive: 1,
                negative: 1
            }
        );
        assert_eq!(tally.code(), SentimentCode::Neutral);
    }

    #[test]
    fn code_values() {
        assert_eq!(SentimentCode::Positive.value(), 1);
        assert_eq!(SentimentCode::Negative.value(), -1);
        assert_eq!(SentimentCode::Neutral.value(), 0);
        assert_eq!(SentimentCode::NoSignal.value(), -2);
        assert_eq!(SentimentCode::NoSignal.to_string(), "-2");
    }
}
