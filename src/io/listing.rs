use std::io::{self, BufRead, Write};

use super::InputError;
use crate::genomics::{nucleotide, AmbiguityTract, SequenceProfile, SnpEntry};

/// Header row of a profile listing.
pub const LISTING_HEADER: &str = "query,SNPs,ambiguities,SNPcount,ambcount";

/// Write the listing header.
pub fn write_listing_header<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{LISTING_HEADER}")
}

/// Write one listing row for `profile`.
pub fn write_listing_row<W: Write>(writer: &mut W, profile: &SequenceProfile) -> io::Result<()> {
    writeln!(
        writer,
        "{},{},{},{},{}",
        profile.id(),
        profile.snps_field(),
        profile.ambiguities_field(),
        profile.snp_count(),
        profile.ambiguity_count()
    )
}

/// Render a complete listing into a string (useful for tests and snapshots).
pub fn render_profile_listing(profiles: &[SequenceProfile]) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_listing_header(&mut buffer)?;
    for profile in profiles {
        write_listing_row(&mut buffer, profile)?;
    }
    String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Streaming parser of profile listings.
///
/// The header is checked before the first row is returned. Row ordinals
/// become profile indices.
#[derive(Debug)]
pub struct ListingRecords<R: BufRead> {
    lines: io::Lines<R>,
    line: usize,
    next_index: usize,
    header_checked: bool,
    failed: bool,
}

impl<R: BufRead> ListingRecords<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            next_index: 0,
            header_checked: false,
            failed: false,
        }
    }

    fn check_header(&mut self) -> Result<(), InputError> {
        self.header_checked = true;
        let found = match self.lines.next() {
            Some(line) => line?,
            None => String::new(),
        };
        self.line += 1;
        if found.trim_end() != LISTING_HEADER {
            return Err(InputError::MalformedHeader {
                expected: LISTING_HEADER,
                found,
            });
        }
        Ok(())
    }

    fn parse_row(&mut self, row: &str) -> Result<SequenceProfile, InputError> {
        let line = self.line;
        let malformed = |reason: String| InputError::MalformedRow { line, reason };

        let fields: Vec<&str> = row.split(',').collect();
        let [id, snps, tracts, snp_count, ambiguity_count] = fields[..] else {
            return Err(malformed(format!("expected 5 fields, found {}", fields.len())));
        };

        let snps = split_tokens(snps)
            .map(parse_snp)
            .collect::<Result<Vec<_>, _>>()
            .map_err(&malformed)?;
        let tracts = split_tokens(tracts)
            .map(parse_tract)
            .collect::<Result<Vec<_>, _>>()
            .map_err(&malformed)?;
        let snp_count: usize = parse_count(snp_count).map_err(&malformed)?;
        let ambiguity_count: u32 = parse_count(ambiguity_count).map_err(&malformed)?;

        if snps.windows(2).any(|w| w[0].position >= w[1].position) {
            return Err(malformed("SNPs are not in increasing position order".to_string()));
        }
        if tracts.windows(2).any(|w| w[0].stop >= w[1].start) {
            return Err(malformed("ambiguity tracts overlap or are out of order".to_string()));
        }
        if snp_count != snps.len() {
            return Err(malformed(format!(
                "SNP count {snp_count} does not match {} listed SNPs",
                snps.len()
            )));
        }
        let covered: u32 = tracts.iter().map(AmbiguityTract::width).sum();
        if covered != ambiguity_count {
            return Err(malformed(format!(
                "ambiguity count {ambiguity_count} does not match {covered} columns in tracts"
            )));
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(SequenceProfile::new(id, index, snps, tracts, ambiguity_count))
    }
}

impl<R: BufRead> Iterator for ListingRecords<R> {
    type Item = Result<SequenceProfile, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if !self.header_checked {
            if let Err(err) = self.check_header() {
                self.failed = true;
                return Some(Err(err));
            }
        }
        loop {
            let row = match self.lines.next()? {
                Ok(row) => row,
                Err(err) => return Some(Err(err.into())),
            };
            self.line += 1;
            let row = row.trim_end();
            if row.is_empty() {
                continue;
            }
            return Some(self.parse_row(row));
        }
    }
}

fn split_tokens(field: &str) -> impl Iterator<Item = &str> {
    field.split('|').filter(|token| !token.is_empty())
}

fn parse_symbol(symbol: u8, token: &str) -> Result<u8, String> {
    nucleotide::encode(symbol)
        .map(nucleotide::decode)
        .ok_or_else(|| format!("unrecognized nucleotide in SNP '{token}'"))
}

fn parse_snp(token: &str) -> Result<SnpEntry, String> {
    let bytes = token.as_bytes();
    if bytes.len() < 3 || !token.is_ascii() {
        return Err(format!("SNP '{token}' is not <ref><position><alt>"));
    }
    let position = token[1..token.len() - 1]
        .parse::<u32>()
        .ok()
        .filter(|&position| position > 0)
        .ok_or_else(|| format!("SNP '{token}' has an invalid position"))?;
    Ok(SnpEntry {
        position,
        reference: parse_symbol(bytes[0], token)?,
        alternate: parse_symbol(bytes[bytes.len() - 1], token)?,
    })
}

fn parse_tract(token: &str) -> Result<AmbiguityTract, String> {
    let parse = |value: &str| {
        value
            .parse::<u32>()
            .ok()
            .filter(|&position| position > 0)
            .ok_or_else(|| format!("ambiguity tract '{token}' has an invalid position"))
    };
    let (start, stop) = match token.split_once('-') {
        Some((start, stop)) => (parse(start)?, parse(stop)?),
        None => {
            let site = parse(token)?;
            (site, site)
        }
    };
    if stop < start {
        return Err(format!("ambiguity tract '{token}' ends before it starts"));
    }
    Ok(AmbiguityTract::new(start, stop))
}

fn parse_count<T: std::str::FromStr>(field: &str) -> Result<T, String> {
    field
        .parse()
        .map_err(|_| format!("count '{field}' is not a non-negative integer"))
}
