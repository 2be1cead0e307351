use crate::error::CmdError;
use anyhow::Result;
use bstr::{io::BufReadExt, BString, ByteSlice};
use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;

/// Builder struct for GfaParser
#[derive(Debug, Default, Clone, Copy)]
pub struct GfaParserBuilder {
    pub segments: bool,
    pub links: bool,
    pub paths: bool,
}

impl GfaParserBuilder {
    /// Parse no GFA lines, useful if you only want to parse one line type.
    pub fn new() -> Self {
        GfaParserBuilder {
            segments: false,
            links: false,
            paths: false,
        }
    }

    /// Parse every record kind the pruner understands.
    pub fn all() -> Self {
        GfaParserBuilder {
            segments: true,
            links: true,
            paths: true,
        }
    }

    pub fn get_segments(&mut self, include: bool) -> &mut Self {
        self.segments = include;
        self
    }

    pub fn get_links(&mut self, include: bool) -> &mut Self {
        self.links = include;
        self
    }

    pub fn get_paths(&mut self, include: bool) -> &mut Self {
        self.paths = include;
        self
    }

    pub fn build(&mut self) -> GfaParser {
        GfaParser {
            segments: self.segments,
            links: self.links,
            paths: self.paths,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GfaParser {
    segments: bool,
    links: bool,
    paths: bool,
}

impl Default for GfaParser {
    fn default() -> Self {
        let mut config = GfaParserBuilder::all();
        config.build()
    }
}

pub enum GfaEntity {
    Segment(Segment),
    Link(Link),
    Path(Path),
}

impl GfaParser {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parse one line. Returns `None` for blank lines, disabled record kinds
    /// and every record type other than S, L and P.
    pub fn parse_gfa_line(
        &self,
        line_no: usize,
        bytes: &[u8],
    ) -> Result<Option<GfaEntity>, CmdError> {
        let line = bytes.trim_with(|c| c.is_ascii_whitespace());
        let mut fields = line.fields();
        let hdr = match fields.next() {
            Some(hdr) => hdr,
            None => return Ok(None),
        };

        match hdr {
            b"S" if self.segments => Ok(Some(GfaEntity::Segment(Segment::parse_line(
                line_no, line, fields,
            )?))),
            b"L" if self.links => Ok(Some(GfaEntity::Link(Link::parse_line(
                line_no, line, fields,
            )?))),
            b"P" if self.paths => Ok(Some(GfaEntity::Path(Path::parse_line(
                line_no, line, fields,
            )?))),
            _ => Ok(None),
        }
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<GfaModel, CmdError> {
        let mut gfa = GfaModel::new();
        for (i, line) in reader.byte_lines().enumerate() {
            let line = line.map_err(CmdError::LineReadError)?;
            if let Some(entity) = self.parse_gfa_line(i + 1, &line)? {
                gfa.add_entity(entity);
            }
        }
        Ok(gfa)
    }

    pub fn parse_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<GfaModel, CmdError> {
        use std::{fs::File, io::BufReader};

        let file = File::open(path).map_err(CmdError::FileOpenError)?;
        self.parse_reader(BufReader::new(file))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orient {
    Forward,
    Reverse,
}

impl Orient {
    fn parse(field: &[u8]) -> Option<Self> {
        match field {
            b"+" => Some(Orient::Forward),
            b"-" => Some(Orient::Reverse),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Orient::Forward => '+',
            Orient::Reverse => '-',
        }
    }
}

/// Orientation-qualified link identity, rendered as `1+:2+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkKey {
    pub from: String,
    pub from_orient: Orient,
    pub to: String,
    pub to_orient: Orient,
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.from,
            self.from_orient.as_char(),
            self.to,
            self.to_orient.as_char()
        )
    }
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub id: String,
    pub record: BString,
}

#[derive(Debug, Clone)]
pub struct Link {
    pub key: LinkKey,
    pub record: BString,
}

impl Link {
    pub fn from(&self) -> &str {
        &self.key.from
    }

    pub fn to(&self) -> &str {
        &self.key.to
    }

    /// Only links joining two forward strands can be backed by a path.
    pub fn is_forward(&self) -> bool {
        self.key.from_orient == Orient::Forward && self.key.to_orient == Orient::Forward
    }
}

#[derive(Debug, Clone)]
pub struct Path {
    pub name: String,
    pub steps: Vec<String>,
    pub record: BString,
}

/// Parsed graph: records in first-seen order plus the path-derived
/// frequency tables.
#[derive(Debug, Default)]
pub struct GfaModel {
    pub segments: Vec<Segment>,
    segment_index: HashMap<String, usize>,
    pub links: Vec<Link>,
    link_index: HashMap<LinkKey, usize>,
    pub paths: Vec<Path>,
    pub edge_weight: HashMap<(String, String), u64>,
    pub triple_weight: HashMap<(String, String, String), u64>,
    pub path_nodes: HashMap<String, u64>,
}

impl GfaModel {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_entity(&mut self, entity: GfaEntity) {
        match entity {
            GfaEntity::Segment(segment) => match self.segment_index.get(&segment.id) {
                Some(&i) => self.segments[i] = segment,
                None => {
                    self.segment_index
                        .insert(segment.id.clone(), self.segments.len());
                    self.segments.push(segment);
                }
            },
            GfaEntity::Link(link) => match self.link_index.get(&link.key) {
                Some(&i) => self.links[i] = link,
                None => {
                    self.link_index.insert(link.key.clone(), self.links.len());
                    self.links.push(link);
                }
            },
            GfaEntity::Path(path) => {
                self.count_path(&path);
                self.paths.push(path);
            }
        }
    }

    fn count_path(&mut self, path: &Path) {
        for node in &path.steps {
            *self.path_nodes.entry(node.clone()).or_insert(0) += 1;
        }
        for pair in path.steps.windows(2) {
            *self
                .edge_weight
                .entry((pair[0].clone(), pair[1].clone()))
                .or_insert(0) += 1;
        }
        for triple in path.steps.windows(3) {
            *self
                .triple_weight
                .entry((triple[0].clone(), triple[1].clone(), triple[2].clone()))
                .or_insert(0) += 1;
        }
    }

    /// Number of path steps on `id`; nodes without an S line count too.
    pub fn path_count(&self, id: &str) -> u64 {
        self.path_nodes.get(id).copied().unwrap_or(0)
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segment_index.get(id).map(|&i| &self.segments[i])
    }

    pub fn link_position(&self, key: &LinkKey) -> Option<usize> {
        self.link_index.get(key).copied()
    }

    pub fn edge_weight(&self, from: &str, to: &str) -> Option<u64> {
        self.edge_weight
            .get(&(from.to_owned(), to.to_owned()))
            .copied()
    }

    pub fn triple_weight(&self, prev: &str, node: &str, next: &str) -> Option<u64> {
        self.triple_weight
            .get(&(prev.to_owned(), node.to_owned(), next.to_owned()))
            .copied()
    }

    /// Path evidence for a link; `None` when no path walks it.
    pub fn link_weight(&self, link: &Link) -> Option<u64> {
        if link.is_forward() {
            self.edge_weight(link.from(), link.to())
        } else {
            None
        }
    }

    /// Single-edge weights sorted ascending by weight, then by node ids.
    pub fn sorted_edge_weights(&self) -> Vec<(&str, &str, u64)> {
        let mut table: Vec<(&str, &str, u64)> = self
            .edge_weight
            .iter()
            .map(|((u, v), &w)| (u.as_str(), v.as_str(), w))
            .collect();
        table.sort_unstable_by(|a, b| (a.2, a.0, a.1).cmp(&(b.2, b.0, b.1)));
        table
    }
}

trait GfaParsable {
    fn parse_line<'a>(
        line_no: usize,
        line: &[u8],
        fields: impl Iterator<Item = &'a [u8]>,
    ) -> Result<Self, CmdError>
    where
        Self: Sized;
}

fn record_text(line: &[u8]) -> BString {
    BString::from(line)
}

impl GfaParsable for Segment {
    fn parse_line<'a>(
        line_no: usize,
        line: &[u8],
        mut fields: impl Iterator<Item = &'a [u8]>,
    ) -> Result<Self, CmdError> {
        let id = fields.next().ok_or(CmdError::MalformedRecord {
            line: line_no,
            kind: 'S',
            reason: "missing segment id",
        })?;
        Ok(Segment {
            id: String::from_utf8_lossy(id).into_owned(),
            record: record_text(line),
        })
    }
}

impl GfaParsable for Link {
    fn parse_line<'a>(
        line_no: usize,
        line: &[u8],
        mut fields: impl Iterator<Item = &'a [u8]>,
    ) -> Result<Self, CmdError> {
        let malformed = |reason| CmdError::MalformedRecord {
            line: line_no,
            kind: 'L',
            reason,
        };
        let from = fields.next().ok_or_else(|| malformed("missing source id"))?;
        let from_orient = fields
            .next()
            .and_then(Orient::parse)
            .ok_or_else(|| malformed("source orientation must be + or -"))?;
        let to = fields.next().ok_or_else(|| malformed("missing target id"))?;
        let to_orient = fields
            .next()
            .and_then(Orient::parse)
            .ok_or_else(|| malformed("target orientation must be + or -"))?;
        Ok(Link {
            key: LinkKey {
                from: String::from_utf8_lossy(from).into_owned(),
                from_orient,
                to: String::from_utf8_lossy(to).into_owned(),
                to_orient,
            },
            record: record_text(line),
        })
    }
}

impl GfaParsable for Path {
    fn parse_line<'a>(
        line_no: usize,
        line: &[u8],
        mut fields: impl Iterator<Item = &'a [u8]>,
    ) -> Result<Self, CmdError> {
        let malformed = |reason| CmdError::MalformedRecord {
            line: line_no,
            kind: 'P',
            reason,
        };
        let name = fields.next().ok_or_else(|| malformed("missing path name"))?;
        let walk = fields.next().ok_or_else(|| malformed("missing segment list"))?;

        let mut steps = Vec::new();
        for token in walk.split_str(b",") {
            match token.split_last() {
                Some((b'+', id)) if !id.is_empty() => {
                    steps.push(String::from_utf8_lossy(id).into_owned())
                }
                Some((b'-', _)) => {
                    return Err(CmdError::ReverseOrientedPath {
                        line: line_no,
                        token: String::from_utf8_lossy(token).into_owned(),
                    })
                }
                _ => return Err(malformed("path step must be <id>+")),
            }
        }

        Ok(Path {
            name: String::from_utf8_lossy(name).into_owned(),
            steps,
            record: record_text(line),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::BufReader;
    use std::io::Cursor;

    fn parse(data: &[u8]) -> Result<GfaModel, CmdError> {
        GfaParser::default().parse_reader(BufReader::new(Cursor::new(data.to_vec())))
    }

    #[test]
    fn test_weight_tables() {
        let gfa_data = b"H\tVN:Z:1.0\n\
            S\t1\tACGT\n\
            S\t2\tTT\n\
            S\t3\tG\n\
            S\t4\tCCA\n\
            L\t1\t+\t2\t+\t0M\n\
            L\t2\t+\t3\t+\t0M\n\
            L\t3\t+\t4\t+\t0M\n\
            L\t2\t+\t4\t+\t0M\n\
            P\tr1\t1+,2+,3+,4+\t*\n\
            P\tr2\t1+,2+,4+\t*\n\
            P\tr3\t2+,3+,4+\t*";
        let gfa = parse(gfa_data).expect("Failed to parse GFA");

        assert_eq!(gfa.segments.len(), 4);
        assert_eq!(gfa.links.len(), 4);
        assert_eq!(gfa.paths.len(), 3);

        assert_eq!(gfa.edge_weight("1", "2"), Some(2));
        assert_eq!(gfa.edge_weight("2", "3"), Some(2));
        assert_eq!(gfa.edge_weight("3", "4"), Some(2));
        assert_eq!(gfa.edge_weight("2", "4"), Some(1));
        assert_eq!(gfa.edge_weight("1", "3"), None);
        assert_eq!(gfa.edge_weight.len(), 4);

        assert_eq!(gfa.triple_weight("1", "2", "3"), Some(1));
        assert_eq!(gfa.triple_weight("2", "3", "4"), Some(2));
        assert_eq!(gfa.triple_weight("1", "2", "4"), Some(1));
        assert_eq!(gfa.triple_weight.len(), 3);

        assert_eq!(gfa.path_count("2"), 3);
        assert_eq!(gfa.path_count("1"), 2);
        assert_eq!(gfa.path_count("9"), 0);
    }

    #[test]
    fn test_reverse_path_rejected() {
        let gfa_data = b"S\t1\tA\n\
            S\t2\tC\n\
            L\t1\t+\t2\t-\t0M\n\
            P\tr1\t1+,2-\t*";
        match parse(gfa_data) {
            Err(CmdError::ReverseOrientedPath { line, token }) => {
                assert_eq!(line, 4);
                assert_eq!(token, "2-");
            }
            other => panic!("expected reverse path error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_duplicates_overwrite_in_place() {
        let gfa_data = b"S\t1\tA\n\
            S\t2\tC\n\
            S\t1\tAAAA\n\
            L\t1\t+\t2\t+\t0M\n\
            L\t1\t+\t2\t+\t1M";
        let gfa = parse(gfa_data).unwrap();
        assert_eq!(gfa.segments.len(), 2);
        assert_eq!(gfa.segments[0].record, "S\t1\tAAAA");
        assert_eq!(gfa.links.len(), 1);
        assert_eq!(gfa.links[0].record, "L\t1\t+\t2\t+\t1M");
        assert_eq!(gfa.links[0].key.to_string(), "1+:2+");
    }

    #[test]
    fn test_records_keep_raw_bytes() {
        let gfa_data = b"S\t1\tAC\xffGT\tLN:i:5\nL\t1\t+\t2\t+\t0M\n";
        let gfa = parse(gfa_data).unwrap();
        assert_eq!(gfa.segments[0].id, "1");
        assert_eq!(gfa.segments[0].record.as_slice(), b"S\t1\tAC\xffGT\tLN:i:5");
        assert_eq!(gfa.links[0].record, "L\t1\t+\t2\t+\t0M");
    }

    #[test]
    fn test_other_records_ignored() {
        let gfa_data = b"H\tVN:Z:1.0\n\
            # comment\n\
            \n\
            W\tsample\t0\tchr1\t0\t3\t>1>2\n\
            S\t1\tA\n";
        let gfa = parse(gfa_data).unwrap();
        assert_eq!(gfa.segments.len(), 1);
        assert!(gfa.links.is_empty());
        assert!(gfa.paths.is_empty());
    }

    #[test]
    fn test_malformed_link() {
        let gfa_data = b"S\t1\tA\nL\t1\t+\t2\n";
        assert!(matches!(
            parse(gfa_data),
            Err(CmdError::MalformedRecord {
                line: 2,
                kind: 'L',
                ..
            })
        ));
        let gfa_data = b"L\t1\tx\t2\t+\t0M\n";
        assert!(matches!(
            parse(gfa_data),
            Err(CmdError::MalformedRecord { kind: 'L', .. })
        ));
    }

    #[test]
    fn test_unoriented_path_step() {
        let gfa_data = b"P\tr1\t1+,2\t*\n";
        assert!(matches!(
            parse(gfa_data),
            Err(CmdError::MalformedRecord { kind: 'P', .. })
        ));
    }

    #[test]
    fn test_links_only_parser() {
        let gfa_data = b"S\t1\tA\nL\t1\t+\t2\t+\t0M\nP\tr1\t1+,2-\t*\n";
        let parser = GfaParserBuilder::new().get_links(true).build();
        let gfa = parser
            .parse_reader(BufReader::new(Cursor::new(gfa_data.to_vec())))
            .unwrap();
        assert!(gfa.segments.is_empty());
        assert_eq!(gfa.links.len(), 1);
        assert!(gfa.edge_weight.is_empty());
    }

    #[test]
    fn test_sorted_edge_weights() {
        let gfa_data = b"P\ta\t1+,2+,3+\t*\nP\tb\t1+,2+\t*\nP\tc\t5+,4+\t*\n";
        let gfa = parse(gfa_data).unwrap();
        assert_eq!(
            gfa.sorted_edge_weights(),
            vec![("2", "3", 1), ("5", "4", 1), ("1", "2", 2)]
        );
    }
}
