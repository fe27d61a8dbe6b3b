use crate::SentimentError;

/// Sums codes or partial totals of one product. Summing any split of the
/// values and then summing the partial results gives the same total.
pub fn total<I>(values: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    values.into_iter().sum()
}

/// Like [`total`] over the textual values a reduce receives.
pub fn total_of<'a, I>(values: I) -> Result<i64, SentimentError>
where
    I: IntoIterator<Item = &'a str>,
{
    let values = values
        .into_iter()
        .map(|value| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| SentimentError::InvalidValue(value.to_owned()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(total(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SentimentCode;

    #[test]
    fn sums_codes() {
        let codes = vec![
            SentimentCode::Positive,
            SentimentCode::Negative,
            SentimentCode::NoSignal,
            SentimentCode::NoSignal,
            SentimentCode::Neutral,
        ];
        assert_eq!(total(codes.iter().map(|c| c.value())), -4);
        assert_eq!(total(Vec::new()), 0);
    }

    #[test]
    fn any_partition_gives_the_same_total() {
        let codes = vec![1, -1, -2, 0, 1, 1, -2, -1, 0, 1];
        let whole = total(codes.clone());
        for split in 0..=codes.len() {
            let (left, right) = codes.split_at(split);
            let partials = vec![total(left.to_vec()), total(right.to_vec())];
            assert_eq!(total(partials), whole);
        }
    }

    #[test]
    fn textual_values() {
        assert_eq!(total_of(vec!["1", "-2", "-17", "0"]).unwrap(), -18);
        match total_of(vec!["1", "one"]) {
            Err(SentimentError::InvalidValue(v)) => assert_eq!(v, "one"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
