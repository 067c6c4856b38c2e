//! SVG-style path data interpreter.
//!
//! Parses `M L H V C S Q T A Z` commands (absolute upper case, relative
//! lower case) and flattens them straight into [`PathPointList`]s, one per
//! subpath. Curves go through the bezier flattener, arcs through
//! [`BezierArcSvg`].

use crate::basics::PointD;
use crate::bezier_arc::BezierArcSvg;
use crate::curves::flatten_bezier;
use crate::error::{DrawError, Result};
use crate::path_points::PathPointList;

// ============================================================================
// Source
// ============================================================================

/// A character cursor that tracks line and column for error reporting.
struct Source<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Source<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> DrawError {
        DrawError::PathSyntax {
            line: self.line,
            column: self.col,
            message: message.into(),
        }
    }

    /// True if the next token can start a number.
    fn at_number(&mut self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
    }

    fn number(&mut self) -> Result<f64> {
        self.skip_whitespace();
        let mut buf = String::new();
        if let Some(c @ ('-' | '+')) = self.peek() {
            buf.push(c);
            self.advance();
        }
        self.digits(&mut buf);
        if self.peek() == Some('.') {
            buf.push('.');
            self.advance();
            self.digits(&mut buf);
        }
        if let Some(c @ ('e' | 'E')) = self.peek() {
            buf.push(c);
            self.advance();
            if let Some(s @ ('-' | '+')) = self.peek() {
                buf.push(s);
                self.advance();
            }
            self.digits(&mut buf);
        }
        let value: f64 = buf
            .parse()
            .map_err(|_| self.error(format!("expected number, got {buf:?}")))?;
        if !value.is_finite() {
            return Err(DrawError::NonFiniteCoordinate("path"));
        }
        Ok(value)
    }

    fn digits(&mut self, buf: &mut String) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            buf.push(c);
            self.advance();
        }
    }

    fn flag(&mut self) -> Result<bool> {
        self.skip_whitespace();
        match self.peek() {
            Some('0') => {
                self.advance();
                Ok(false)
            }
            Some('1') => {
                self.advance();
                Ok(true)
            }
            other => Err(self.error(format!("expected flag (0/1), got {other:?}"))),
        }
    }
}

// ============================================================================
// Interpreter state
// ============================================================================

/// Everything carried from one path command to the next.
#[derive(Debug, Default)]
struct PathParserState {
    current: PointD,
    subpath_start: PointD,
    /// Second control point of the previous cubic, if the previous command
    /// was `C` or `S`.
    cubic_ctrl: Option<PointD>,
    /// Control point of the previous quadratic, if the previous command was
    /// `Q` or `T`.
    quad_ctrl: Option<PointD>,
    list: PathPointList,
    subpaths: Vec<PathPointList>,
}

impl PathParserState {
    /// Finish the current subpath. A lone move produces nothing.
    fn flush(&mut self) {
        let list = std::mem::take(&mut self.list);
        if list.coordinate_count() > 1 {
            self.subpaths.push(list);
        }
    }

    fn move_to(&mut self, p: PointD) -> Result<()> {
        self.flush();
        self.current = p;
        self.subpath_start = p;
        self.list.try_push(p)
    }

    fn ensure_started(&mut self) -> Result<()> {
        if self.list.is_empty() {
            self.list.try_push(self.current)?;
        }
        Ok(())
    }

    fn line_to(&mut self, p: PointD) -> Result<()> {
        self.ensure_started()?;
        self.list.try_push(p)?;
        self.current = p;
        Ok(())
    }

    /// Append `pts`, dropping a leading point that repeats the current one.
    fn append(&mut self, pts: &[PointD]) -> Result<()> {
        self.ensure_started()?;
        let skip = match (self.list.last(), pts.first()) {
            (Some(a), Some(b)) if a.coincides(b) => 1,
            _ => 0,
        };
        self.list.extend_from_slice(&pts[skip..])?;
        if let Some(p) = pts.last() {
            self.current = *p;
        }
        Ok(())
    }

    fn curve_to(&mut self, controls: &[PointD]) -> Result<()> {
        let mut span = PathPointList::new();
        flatten_bezier(controls, &mut span)?;
        self.append(span.points())
    }

    fn close(&mut self) -> Result<()> {
        if !self.list.is_empty() {
            if let Some(last) = self.list.last() {
                if !last.coincides(&self.subpath_start) {
                    self.list.try_push(self.subpath_start)?;
                }
            }
            self.list.set_closed(true);
        }
        self.flush();
        self.current = self.subpath_start;
        Ok(())
    }

    fn reflect(&self, ctrl: Option<PointD>) -> PointD {
        match ctrl {
            Some(c) => PointD::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y),
            None => self.current,
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parse and flatten SVG path data into subpaths.
///
/// The data must start with a moveto. Whitespace and commas separate
/// arguments; a command letter may be followed by several argument groups,
/// and the groups after an `M`/`m` are implicit line-tos.
pub fn parse_path(text: &str) -> Result<Vec<PathPointList>> {
    let mut src = Source::new(text);
    let mut state = PathParserState::default();
    let mut implicit: Option<char> = None;
    let mut started = false;

    src.skip_whitespace();
    while let Some(c) = src.peek() {
        let cmd = if c.is_ascii_alphabetic() {
            src.advance();
            c
        } else {
            match implicit {
                Some(cmd) if src.at_number() => cmd,
                _ => return Err(src.error(format!("unexpected character {c:?}"))),
            }
        };
        if !started && !matches!(cmd, 'M' | 'm') {
            return Err(src.error(format!("expected moveto, got {cmd:?}")));
        }
        started = true;

        let relative = cmd.is_ascii_lowercase();
        let origin = if relative { state.current } else { PointD::default() };
        let point = |src: &mut Source| -> Result<PointD> {
            let x = src.number()?;
            let y = src.number()?;
            Ok(PointD::new(origin.x + x, origin.y + y))
        };

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        match cmd {
            'M' | 'm' => {
                let p = point(&mut src)?;
                state.move_to(p)?;
            }
            'L' | 'l' => {
                let p = point(&mut src)?;
                state.line_to(p)?;
            }
            'H' | 'h' => {
                let x = src.number()? + origin.x;
                state.line_to(PointD::new(x, state.current.y))?;
            }
            'V' | 'v' => {
                let y = src.number()? + origin.y;
                state.line_to(PointD::new(state.current.x, y))?;
            }
            'C' | 'c' => {
                let c1 = point(&mut src)?;
                let c2 = point(&mut src)?;
                let end = point(&mut src)?;
                state.curve_to(&[state.current, c1, c2, end])?;
                cubic_ctrl = Some(c2);
            }
            'S' | 's' => {
                let c1 = state.reflect(state.cubic_ctrl);
                let c2 = point(&mut src)?;
                let end = point(&mut src)?;
                state.curve_to(&[state.current, c1, c2, end])?;
                cubic_ctrl = Some(c2);
            }
            'Q' | 'q' => {
                let c = point(&mut src)?;
                let end = point(&mut src)?;
                state.curve_to(&[state.current, c, end])?;
                quad_ctrl = Some(c);
            }
            'T' | 't' => {
                let c = state.reflect(state.quad_ctrl);
                let end = point(&mut src)?;
                state.curve_to(&[state.current, c, end])?;
                quad_ctrl = Some(c);
            }
            'A' | 'a' => {
                let rx = src.number()?;
                let ry = src.number()?;
                let angle = src.number()?;
                let large_arc = src.flag()?;
                let sweep = src.flag()?;
                let end = point(&mut src)?;
                let arc = BezierArcSvg::new(
                    state.current,
                    end,
                    PointD::new(rx, ry),
                    angle,
                    large_arc,
                    sweep,
                );
                let mut span = PathPointList::new();
                arc.trace(&mut span)?;
                state.append(span.points())?;
                state.current = end;
            }
            'Z' | 'z' => state.close()?,
            other => return Err(src.error(format!("invalid command {other:?}"))),
        }
        state.cubic_ctrl = cubic_ctrl;
        state.quad_ctrl = quad_ctrl;

        implicit = match cmd {
            'M' => Some('L'),
            'm' => Some('l'),
            'Z' | 'z' => None,
            c => Some(c),
        };
        src.skip_whitespace();
    }
    state.flush();
    log::trace!("parsed path into {} subpaths", state.subpaths.len());
    Ok(state.subpaths)
}
