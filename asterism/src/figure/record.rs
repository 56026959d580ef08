use crate::sky::SkyPoint;

/// A named endpoint of a figure segment.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStar {
    pub name: String,
    pub position: SkyPoint,
}

/// One line of a stick-figure definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Starts a new figure. The label may be empty.
    Header(String),
    /// `nameA raA decA nameB raB decB`, degrees. Anything after the sixth
    /// token is ignored.
    Segment(FigureStar, FigureStar),
    Blank,
    Malformed,
}

/// Classifies `line`. Headers start with `marker`; the label is the rest of the
/// line with surrounding whitespace removed.
pub fn parse_record(line: &str, marker: char) -> Record {
    if let Some(label) = line.strip_prefix(marker) {
        return Record::Header(label.trim().to_string());
    }
    if line.trim().is_empty() {
        return Record::Blank;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some([name_a, ra_a, dec_a, name_b, ra_b, dec_b]) = tokens.get(..6) else {
        return Record::Malformed;
    };
    let number = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
    match (number(*ra_a), number(*dec_a), number(*ra_b), number(*dec_b)) {
        (Some(ra_a), Some(dec_a), Some(ra_b), Some(dec_b)) => Record::Segment(
            FigureStar {
                name: name_a.to_string(),
                position: SkyPoint::new(ra_a, dec_a),
            },
            FigureStar {
                name: name_b.to_string(),
                position: SkyPoint::new(ra_b, dec_b),
            },
        ),
        _ => Record::Malformed,
    }
}
