//! Raw pointer samples and their plain-text loader.

use kurbo::Point;

use crate::error::InkError;

/// One pointer sample: position in content coordinates, time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub pos: Point,
    pub time: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, time: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            time,
        }
    }
}

/// Parse samples from text, one `x y t` triple per line.
///
/// Fields may be separated by whitespace or commas. Blank lines and
/// lines starting with `#` are ignored.
pub fn parse_samples(text: &str) -> Result<Vec<Sample>, InkError> {
    let mut samples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() != 3 {
            return Err(InkError::Parse {
                line: index + 1,
                message: format!("expected 3 fields (x y t), found {}", fields.len()),
            });
        }
        let mut values = [0.0; 3];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|_| InkError::Parse {
                line: index + 1,
                message: format!("not a number: {:?}", field),
            })?;
        }
        samples.push(Sample::new(values[0], values[1], values[2]));
    }
    Ok(samples)
}
