//! Board authoring format.
//!
//! A board is a rectangular grid of whitespace-separated cell tokens, one
//! text row per board row. `.` is a void cell; any other token is a zone
//! number followed by comma-separated attributes:
//!
//! | attribute          | meaning                                         |
//! |--------------------|-------------------------------------------------|
//! | `s` `b` `v`        | street, building or vault (default street)      |
//! | `N` `S` `E` `W` +  | side: `w` wall, `o`/`c` open/closed door,       |
//! |                    | `j` jammed door, `l<r|b|g|y>` locked door, `r`  |
//! |                    | rampart                                         |
//! | `U<x>.<y><o|c>`    | ascending link to cell `(x, y)` behind a door   |
//! | `D<x>.<y><o|c>`    | descending link                                 |
//! | `sp` `obj` `start` | spawn marker, objective, starting zone          |
//! | `q<n>`             | quadrant capacity                               |
//!
//! Lines starting with `#` are comments. Sides are mirrored onto the
//! neighbor, so each wall or door only needs declaring once.
//!
//! ```text
//! # street | building, closed door between
//! 1,start,Ec  2,b
//! 1,sp        2,b,obj
//! ```

use std::collections::BTreeMap;

use horde_core::{
    Board, BoardBuilder, BoardError, CellPos, Direction, DoorState, Environment, LockColor,
    WallState, ZoneId,
};

/// Parse failure, located at a 1-based line and column of the source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("board source has no rows")]
    Empty,

    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column {col}: bad zone number `{token}`")]
    BadZone {
        line: usize,
        col: usize,
        token: String,
    },

    #[error("line {line}, column {col}: unknown attribute `{attr}`")]
    UnknownAttribute {
        line: usize,
        col: usize,
        attr: String,
    },

    #[error("line {line}, column {col}: {source}")]
    Invalid {
        line: usize,
        col: usize,
        #[source]
        source: BoardError,
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl BoardParseError {
    /// `(line, column)` of the failure, when it points at a token.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::BadZone { line, col, .. }
            | Self::UnknownAttribute { line, col, .. }
            | Self::Invalid { line, col, .. } => Some((*line, *col)),
            Self::RaggedRow { line, .. } => Some((*line, 1)),
            Self::Empty | Self::Board(_) => None,
        }
    }
}

/// One attribute of a cell token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attr {
    Environment(Environment),
    Wall(Direction, WallState),
    Door(Direction, DoorState, Option<LockColor>),
    Link(Direction, CellPos, DoorState),
    Spawn,
    Objective,
    Start,
    Capacity(u8),
}

fn parse_attr(attr: &str) -> Option<Attr> {
    match attr {
        "s" => return Some(Attr::Environment(Environment::Street)),
        "b" => return Some(Attr::Environment(Environment::Building)),
        "v" => return Some(Attr::Environment(Environment::Vault)),
        "sp" => return Some(Attr::Spawn),
        "obj" => return Some(Attr::Objective),
        "start" => return Some(Attr::Start),
        _ => {}
    }
    let mut chars = attr.chars();
    let head = chars.next()?;
    let rest = chars.as_str();
    match head {
        'N' | 'S' | 'E' | 'W' => {
            let dir = match head {
                'N' => Direction::North,
                'S' => Direction::South,
                'E' => Direction::East,
                _ => Direction::West,
            };
            parse_side(dir, rest)
        }
        'U' | 'D' => {
            let dir = if head == 'U' {
                Direction::Ascend
            } else {
                Direction::Descend
            };
            parse_link(dir, rest)
        }
        'q' => rest.parse().ok().map(Attr::Capacity),
        _ => None,
    }
}

fn parse_side(dir: Direction, token: &str) -> Option<Attr> {
    let attr = match token {
        "w" => Attr::Wall(dir, WallState::Wall),
        "r" => Attr::Wall(dir, WallState::Rampart),
        "o" => Attr::Door(dir, DoorState::Open, None),
        "c" => Attr::Door(dir, DoorState::Closed, None),
        "j" => Attr::Door(dir, DoorState::Jammed, None),
        _ => {
            let color = match token.strip_prefix('l')? {
                "r" => LockColor::Red,
                "b" => LockColor::Blue,
                "g" => LockColor::Green,
                "y" => LockColor::Yellow,
                _ => return None,
            };
            Attr::Door(dir, DoorState::Closed, Some(color))
        }
    };
    Some(attr)
}

/// `<x>.<y><o|c>`
fn parse_link(dir: Direction, token: &str) -> Option<Attr> {
    let state = match token.chars().last()? {
        'o' => DoorState::Open,
        'c' => DoorState::Closed,
        _ => return None,
    };
    let coords = &token[..token.len() - 1];
    let (x, y) = coords.split_once('.')?;
    let target = CellPos::new(x.parse().ok()?, y.parse().ok()?);
    Some(Attr::Link(dir, target, state))
}

/// A token with its 1-based column.
fn tokens(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push((s + 1, &line[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s + 1, &line[s..]));
    }
    out
}

/// Parser for the board authoring format.
pub struct BoardLoader;

impl BoardLoader {
    /// Parses `source` into a validated board.
    pub fn parse(source: &str) -> Result<Board, BoardParseError> {
        let rows: Vec<(usize, Vec<(usize, &str)>)> = source
            .lines()
            .enumerate()
            .filter(|(_, l)| {
                let trimmed = l.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .map(|(i, l)| (i + 1, tokens(l)))
            .collect();
        let Some((_, first)) = rows.first() else {
            return Err(BoardParseError::Empty);
        };
        let width = first.len();

        let mut builder = BoardBuilder::new(width as u32, rows.len() as u32);
        // source location of every cell, to place builder errors
        let mut located: BTreeMap<CellPos, (usize, usize)> = BTreeMap::new();

        for (y, (line, cells)) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(BoardParseError::RaggedRow {
                    line: *line,
                    expected: width,
                    found: cells.len(),
                });
            }
            for (x, (col, token)) in cells.iter().enumerate() {
                if *token == "." {
                    continue;
                }
                let pos = CellPos::new(x as i32, y as i32);
                located.insert(pos, (*line, *col));

                let mut parts = token.split(',');
                let zone_token = parts.next().unwrap_or_default();
                let zone = zone_token
                    .parse::<u16>()
                    .map_err(|_| BoardParseError::BadZone {
                        line: *line,
                        col: *col,
                        token: zone_token.to_string(),
                    })?;

                let mut attrs = Vec::new();
                let mut offset = col + zone_token.len() + 1;
                for part in parts {
                    let attr = parse_attr(part).ok_or_else(|| BoardParseError::UnknownAttribute {
                        line: *line,
                        col: offset,
                        attr: part.to_string(),
                    })?;
                    attrs.push(attr);
                    offset += part.len() + 1;
                }

                let environment = attrs
                    .iter()
                    .rev()
                    .find_map(|a| match a {
                        Attr::Environment(env) => Some(*env),
                        _ => None,
                    })
                    .unwrap_or_default();
                builder = builder.cell(pos, ZoneId(zone), environment);
                for attr in attrs {
                    builder = match attr {
                        Attr::Environment(_) => builder,
                        Attr::Wall(dir, wall) => builder.side(pos, dir, wall),
                        Attr::Door(dir, state, lock) => builder.door(pos, dir, state, lock),
                        Attr::Link(dir, target, state) => builder.link(pos, dir, target, state),
                        Attr::Spawn => builder.spawn(pos),
                        Attr::Objective => builder.objective(pos),
                        Attr::Start => builder.start(pos),
                        Attr::Capacity(n) => builder.capacity(pos, n),
                    };
                }
            }
        }

        builder.build().map_err(|error| locate(error, &located))
    }
}

/// Attaches the source location of the offending cell, if the error has one.
fn locate(error: BoardError, located: &BTreeMap<CellPos, (usize, usize)>) -> BoardParseError {
    let pos = match &error {
        BoardError::VoidCell { pos }
        | BoardError::ConflictingSide { pos, .. }
        | BoardError::UnmatchedLink { pos, .. }
        | BoardError::BadCapacity { pos, .. } => Some(*pos),
        _ => None,
    };
    match pos.and_then(|p| located.get(&p)) {
        Some(&(line, col)) => BoardParseError::Invalid {
            line,
            col,
            source: error,
        },
        None => BoardParseError::Board(error),
    }
}
