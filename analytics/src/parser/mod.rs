//! Movie dataset reader with encoding and delimiter auto-detection.
//!
//! Two stages: [`read_table`] turns text into a [`RawTable`] of string
//! cells, then [`parse_movies`] resolves the fixed movie schema by column
//! name and converts each row into a typed [`MovieRecord`]. Any missing
//! column or unreadable value fails the whole parse.
//!
//! The dataset's own `ROI` and `log_ROI` may be blank, `nan` or infinite
//! (zero-budget movies); those read as `None` and are written out as
//! nulls.

use std::path::Path;

use crate::error::{CsvError, CsvResult, InputError, InputResult, PipelineResult};
use crate::models::{columns, EntitySlot, Genre, MovieRecord};

/// Header row plus string records, before any typing.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed movies, in file order
    pub movies: Vec<MovieRecord>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Every column the movie schema requires, in dataset order.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![columns::MOVIE_TITLE];
    cols.extend(columns::ACTOR_NAMES);
    cols.extend(columns::ACTOR_FACEBOOK_LIKES);
    cols.extend([
        columns::DIRECTOR_NAME,
        columns::DIRECTOR_FACEBOOK_LIKES,
        columns::GROSS,
        columns::BUDGET,
        columns::ROI,
        columns::LOG_ROI,
        columns::TITLE_YEAR,
    ]);
    cols.extend(Genre::ALL.iter().map(|g| g.column()));
    cols
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Latin-1 labels decode as windows-1252, its superset, like browsers do.
/// Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.to_string(),
            None => String::from_utf8_lossy(bytes).to_string(),
        },
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read delimited text into a [`RawTable`].
pub fn read_table(content: &str, delimiter: char) -> CsvResult<RawTable> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let delim = u8::try_from(delimiter)
        .ok()
        .filter(|b| b.is_ascii())
        .ok_or(CsvError::InvalidDelimiter(delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok(RawTable { headers, rows })
}

/// Column positions of the movie schema within a [`RawTable`].
struct MovieColumns {
    title: usize,
    gross: usize,
    budget: usize,
    roi: usize,
    log_roi: usize,
    year: usize,
    actors: [(usize, usize); 3],
    director: (usize, usize),
    genres: [usize; Genre::COUNT],
}

impl MovieColumns {
    fn resolve(headers: &[String]) -> InputResult<Self> {
        let find = |name: &str| -> InputResult<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| InputError::MissingColumn(name.to_string()))
        };

        let mut actors = [(0, 0); 3];
        for (i, slot) in actors.iter_mut().enumerate() {
            *slot = (find(columns::ACTOR_NAMES[i])?, find(columns::ACTOR_FACEBOOK_LIKES[i])?);
        }
        let mut genres = [0; Genre::COUNT];
        for genre in Genre::ALL {
            genres[genre.index()] = find(genre.column())?;
        }

        Ok(Self {
            title: find(columns::MOVIE_TITLE)?,
            gross: find(columns::GROSS)?,
            budget: find(columns::BUDGET)?,
            roi: find(columns::ROI)?,
            log_roi: find(columns::LOG_ROI)?,
            year: find(columns::TITLE_YEAR)?,
            actors,
            director: (find(columns::DIRECTOR_NAME)?, find(columns::DIRECTOR_FACEBOOK_LIKES)?),
            genres,
        })
    }
}

/// One record being converted, with its line number for error context.
struct RowReader<'a> {
    record: &'a csv::StringRecord,
    headers: &'a [String],
    line: usize,
}

impl<'a> RowReader<'a> {
    fn raw(&self, idx: usize) -> &'a str {
        self.record.get(idx).unwrap_or("")
    }

    fn invalid(&self, idx: usize, message: impl Into<String>) -> InputError {
        InputError::InvalidValue {
            line: self.line,
            column: self.headers.get(idx).cloned().unwrap_or_default(),
            value: self.raw(idx).to_string(),
            message: message.into(),
        }
    }

    fn text(&self, idx: usize) -> String {
        self.raw(idx).to_string()
    }

    fn name(&self, idx: usize) -> Option<String> {
        let raw = self.raw(idx);
        (!raw.is_empty()).then(|| raw.to_string())
    }

    fn number(&self, idx: usize) -> InputResult<f64> {
        let raw = self.raw(idx);
        if raw.is_empty() {
            return Err(self.invalid(idx, "missing value"));
        }
        match raw.parse::<f64>() {
            Ok(v) if !v.is_nan() => Ok(v),
            _ => Err(self.invalid(idx, "not a number")),
        }
    }

    /// Optional ratio: blank, `nan` and non-finite values are `None`.
    fn ratio(&self, idx: usize) -> InputResult<Option<f64>> {
        let raw = self.raw(idx);
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) => Ok(Some(v).filter(|v| v.is_finite())),
            Err(_) => Err(self.invalid(idx, "not a number")),
        }
    }

    /// Finite, non-negative money amount.
    fn amount(&self, idx: usize) -> InputResult<f64> {
        let value = self.number(idx)?;
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(idx, "must be a finite, non-negative amount"));
        }
        Ok(value)
    }

    fn year(&self, idx: usize) -> InputResult<i64> {
        let raw = self.raw(idx);
        if let Ok(year) = raw.parse::<i64>() {
            return Ok(year);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
            _ => Err(self.invalid(idx, "not a whole year")),
        }
    }

    /// Blank likes mean "unknown".
    fn likes(&self, idx: usize) -> InputResult<Option<f64>> {
        let raw = self.raw(idx);
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(idx, "not a number")),
        }
    }

    fn flag(&self, idx: usize) -> InputResult<bool> {
        match self.raw(idx).to_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" => Ok(false),
            _ => Err(self.invalid(idx, "not a boolean flag")),
        }
    }

    fn slot(&self, (name, likes): (usize, usize)) -> InputResult<EntitySlot> {
        Ok(EntitySlot {
            name: self.name(name),
            facebook_likes: self.likes(likes)?,
        })
    }
}

/// Convert a [`RawTable`] into typed movie records.
pub fn parse_movies(table: &RawTable) -> InputResult<Vec<MovieRecord>> {
    let cols = MovieColumns::resolve(&table.headers)?;
    let mut movies = Vec::with_capacity(table.rows.len());

    for (row_idx, record) in table.rows.iter().enumerate() {
        let row = RowReader {
            record,
            headers: &table.headers,
            // +1 for 0-index, +1 for header
            line: record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + 2),
        };

        let mut genres = [false; Genre::COUNT];
        for genre in Genre::ALL {
            genres[genre.index()] = row.flag(cols.genres[genre.index()])?;
        }

        movies.push(MovieRecord {
            movie_title: row.text(cols.title),
            gross: row.amount(cols.gross)?,
            budget: row.amount(cols.budget)?,
            roi: row.ratio(cols.roi)?,
            log_roi: row.ratio(cols.log_roi)?,
            title_year: row.year(cols.year)?,
            actors: [
                row.slot(cols.actors[0])?,
                row.slot(cols.actors[1])?,
                row.slot(cols.actors[2])?,
            ],
            director: row.slot(cols.director)?,
            genres,
        });
    }

    Ok(movies)
}

/// Parse movie CSV text with an explicit delimiter.
pub fn parse_movies_str(content: &str, delimiter: char) -> PipelineResult<Vec<MovieRecord>> {
    let table = read_table(content, delimiter)?;
    Ok(parse_movies(&table)?)
}

/// Parse movie CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_movies_bytes(bytes: &[u8]) -> PipelineResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile.into());
    }
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    let table = read_table(&content, delimiter)?;
    let movies = parse_movies(&table)?;

    Ok(ParseResult {
        movies,
        encoding,
        delimiter,
        headers: table.headers,
    })
}

/// Parse a movie CSV file with auto-detection of encoding and delimiter.
pub fn parse_movies_file<P: AsRef<Path>>(path: P) -> PipelineResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref()).map_err(CsvError::IoError)?;
    parse_movies_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CSV text with the full schema; each row lists only the non-default cells.
    fn movie_csv(rows: &[&[(&str, &str)]]) -> String {
        let headers = required_columns();
        let mut out = headers.join(",");
        for row in rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| {
                    row.iter()
                        .find(|(k, _)| k == h)
                        .map(|(_, v)| v.to_string())
                        .unwrap_or_else(|| match *h {
                            "gross" | "budget" | "ROI" | "log_ROI" => "0".to_string(),
                            "title_year" => "2000".to_string(),
                            h if Genre::ALL.iter().any(|g| g.column() == h) => "0".to_string(),
                            _ => String::new(),
                        })
                })
                .collect();
            out.push('\n');
            out.push_str(&cells.join(","));
        }
        out
    }

    #[test]
    fn test_required_columns_complete() {
        let cols = required_columns();
        assert_eq!(cols.len(), 1 + 3 + 3 + 2 + 5 + 24);
        assert!(cols.contains(&"Sci-Fi"));
        assert!(cols.contains(&"actor_3_facebook_likes"));
    }

    #[test]
    fn test_parse_full_row() {
        let csv = movie_csv(&[&[
            ("movie_title", "Avatar"),
            ("actor_1_name", "CCH Pounder"),
            ("actor_1_facebook_likes", "1000.0"),
            ("director_name", "James Cameron"),
            ("director_facebook_likes", "0"),
            ("gross", "760505847"),
            ("budget", "237000000"),
            ("ROI", "2.2089"),
            ("log_ROI", "1.1659"),
            ("title_year", "2009.0"),
            ("Action", "1"),
            ("Sci-Fi", "1.0"),
        ]]);
        let movies = parse_movies_str(&csv, ',').unwrap();

        assert_eq!(movies.len(), 1);
        let m = &movies[0];
        assert_eq!(m.movie_title, "Avatar");
        assert_eq!(m.title_year, 2009);
        assert_eq!(m.gross, 760505847.0);
        assert_eq!(m.actors[0].entity_name(), Some("CCH Pounder"));
        assert_eq!(m.actors[0].facebook_likes, Some(1000.0));
        assert_eq!(m.actors[1].name, None);
        assert_eq!(m.actors[1].facebook_likes, None);
        assert_eq!(m.director.entity_name(), Some("James Cameron"));
        assert!(m.has_genre(Genre::Action));
        assert!(m.has_genre(Genre::SciFi));
        assert!(!m.has_genre(Genre::Drama));
    }

    #[test]
    fn test_missing_column() {
        let csv = "movie_title,gross\nA,1";
        let err = parse_movies_str(csv, ',').unwrap_err();
        assert!(err.to_string().contains("Missing required column"));
    }

    #[test]
    fn test_non_numeric_gross_reports_line() {
        let csv = movie_csv(&[&[("movie_title", "A")], &[("movie_title", "B"), ("gross", "lots")]]);
        let err = parse_movies_str(&csv, ',').unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Line 3"), "{}", msg);
        assert!(msg.contains("'gross'"), "{}", msg);
    }

    #[test]
    fn test_negative_budget_rejected() {
        let csv = movie_csv(&[&[("budget", "-5")]]);
        assert!(parse_movies_str(&csv, ',').is_err());
    }

    #[test]
    fn test_bad_genre_flag_rejected() {
        let csv = movie_csv(&[&[("Drama", "maybe")]]);
        let err = parse_movies_str(&csv, ',').unwrap_err();
        assert!(err.to_string().contains("boolean"));
    }

    #[test]
    fn test_quoted_title_with_delimiter() {
        let csv = movie_csv(&[&[("movie_title", "\"Crouching Tiger, Hidden Dragon\"")]]);
        let movies = parse_movies_str(&csv, ',').unwrap();
        assert_eq!(movies[0].movie_title, "Crouching Tiger, Hidden Dragon");
    }

    #[test]
    fn test_empty_csv_error() {
        let err = read_table("", ',').unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = read_table("a;b", '§').unwrap_err();
        assert!(matches!(err, CsvError::InvalidDelimiter('§')));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
    }

    #[test]
    fn test_auto_parse_semicolon() {
        let csv = movie_csv(&[&[("movie_title", "A"), ("gross", "10")]]).replace(',', ";");
        let result = parse_movies_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.delimiter, ';');
        assert_eq!(result.movies.len(), 1);
        assert_eq!(result.movies[0].gross, 10.0);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Amélie" in ISO-8859-1
        let bytes: &[u8] = &[0x41, 0x6D, 0xE9, 0x6C, 0x69, 0x65];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Amélie");
    }

    #[test]
    fn test_latin1_currency_sign() {
        // 0xA4 is the currency sign in ISO-8859-1 but the euro sign in ISO-8859-15
        assert_eq!(decode_content(&[0xA4], "iso-8859-1"), "¤");
        assert_eq!(decode_content(&[0x80], "latin1"), "€");
    }

    #[test]
    fn test_zero_budget_row_with_blank_roi() {
        let csv = movie_csv(&[
            &[("movie_title", "Paid"), ("gross", "100"), ("budget", "50"), ("ROI", "1"), ("log_ROI", "0.6931")],
            &[("movie_title", "Free"), ("gross", "0"), ("budget", "0"), ("ROI", ""), ("log_ROI", "")],
        ]);
        let movies = parse_movies_str(&csv, ',').unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].roi, Some(1.0));
        assert_eq!(movies[1].budget, 0.0);
        assert_eq!(movies[1].roi, None);
        assert_eq!(movies[1].log_roi, None);
    }

    #[test]
    fn test_nan_and_infinite_roi_read_as_missing() {
        let csv = movie_csv(&[
            &[("movie_title", "A"), ("ROI", "nan"), ("log_ROI", "NaN")],
            &[("movie_title", "B"), ("gross", "5"), ("ROI", "inf"), ("log_ROI", "-inf")],
        ]);
        let movies = parse_movies_str(&csv, ',').unwrap();
        assert!(movies.iter().all(|m| m.roi.is_none() && m.log_roi.is_none()));

        let csv = movie_csv(&[&[("ROI", "n/a")]]);
        let err = parse_movies_str(&csv, ',').unwrap_err();
        assert!(err.to_string().contains("'ROI'"));
    }
}
