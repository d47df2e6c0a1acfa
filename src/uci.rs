use log::{debug, warn};
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::board::Position;
use crate::error::{ParseError, SearchError};
use crate::search::{Clock, Score, Search, SearchEvent, SearchHandle, SearchListener, SearchMode};

pub const ENGINE_NAME: &str = "Pulsar";
pub const ENGINE_AUTHOR: &str = "Pulsar Team";

impl SearchMode {
    /// Maps the arguments of a `go` command onto a search mode. Unknown or
    /// malformed tokens are skipped; no limits at all means infinite.
    pub fn from_go(args: &str) -> SearchMode {
        let mut clock = Clock::default();
        let mut timed = false;
        let (mut depth, mut nodes, mut movetime) = (None, None, None);
        let (mut infinite, mut ponder) = (false, false);
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            let mut value = || tokens.next().and_then(|s| s.parse::<u64>().ok());
            match tok {
                "depth" => depth = value(),
                "nodes" => nodes = value(),
                "movetime" => movetime = value(),
                "wtime" => { if let Some(v) = value() { clock.white_time = Duration::from_millis(v); timed = true; } }
                "btime" => { if let Some(v) = value() { clock.black_time = Duration::from_millis(v); timed = true; } }
                "winc" => { if let Some(v) = value() { clock.white_increment = Duration::from_millis(v); } }
                "binc" => { if let Some(v) = value() { clock.black_increment = Duration::from_millis(v); } }
                "movestogo" => clock.moves_to_go = value().map(|v| v as u32),
                "infinite" => infinite = true,
                "ponder" => ponder = true,
                other => debug!("ignoring go token '{other}'"),
            }
        }
        if infinite { return SearchMode::Infinite; }
        if ponder { return SearchMode::Ponder(clock); }
        if let Some(d) = depth { return SearchMode::Depth(d as u32); }
        if let Some(n) = nodes { return SearchMode::Nodes(n); }
        if let Some(t) = movetime { return SearchMode::Time(Duration::from_millis(t)); }
        if timed { return SearchMode::Clock(clock); }
        SearchMode::Infinite
    }
}

/// Writes search events as protocol lines.
pub struct UciListener<W: Write + Send> {
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send> UciListener<W> {
    pub fn new(out: Arc<Mutex<W>>) -> Self { Self { out } }
}

impl<W: Write + Send> SearchListener for UciListener<W> {
    fn notify(&mut self, event: SearchEvent) {
        let line = format_event(&event);
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }
}

pub fn format_event(event: &SearchEvent) -> String {
    match event {
        SearchEvent::Status(s) => {
            let mut line = format!(
                "info depth {} seldepth {} nodes {} time {} nps {}",
                s.depth, s.max_depth, s.nodes, s.elapsed.as_millis(), s.nps
            );
            if let Some(mv) = s.current_move {
                line.push_str(&format!(" currmove {mv} currmovenumber {}", s.current_move_number));
            }
            line
        }
        SearchEvent::Pv(p) => {
            let score = match p.score {
                Score::Cp(cp) => format!("cp {cp}"),
                Score::Mate(m) => format!("mate {m}"),
            };
            let pv: Vec<String> = p.pv.iter().map(|m| m.to_string()).collect();
            format!(
                "info depth {} seldepth {} score {score} nodes {} time {} pv {}",
                p.depth, p.max_depth, p.nodes, p.elapsed.as_millis(), pv.join(" ")
            )
        }
        SearchEvent::BestMove(b) => match (b.best, b.ponder) {
            (Some(best), Some(ponder)) => format!("bestmove {best} ponder {ponder}"),
            (Some(best), None) => format!("bestmove {best}"),
            (None, _) => "bestmove 0000".to_string(),
        },
    }
}

pub struct UciEngine<W: Write + Send + 'static> {
    pos: Position,
    search: Option<SearchHandle>,
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send + 'static> UciEngine<W> {
    pub fn new(out: W) -> Self { Self { pos: Position::startpos(), search: None, out: Arc::new(Mutex::new(out)) } }

    /// Shared output, also used by the search listener.
    pub fn output(&self) -> Arc<Mutex<W>> { Arc::clone(&self.out) }

    pub fn position(&self) -> &Position { &self.pos }

    pub fn is_searching(&self) -> bool { self.search.as_ref().is_some_and(|s| s.is_running()) }

    fn send(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }

    fn cmd_uci(&self) {
        self.send(&format!("id name {ENGINE_NAME}"));
        self.send(&format!("id author {ENGINE_AUTHOR}"));
        self.send("option name Ponder type check default false");
        self.send("uciok");
    }

    fn cmd_ucinewgame(&mut self) {
        self.stop_search();
        self.pos = Position::startpos();
    }

    pub fn cmd_position(&mut self, args: &str) -> Result<(), ParseError> {
        let (setup, moves) = match args.split_once("moves") {
            Some((setup, moves)) => (setup.trim(), Some(moves)),
            None => (args.trim(), None),
        };
        let mut pos = if setup == "startpos" {
            Position::startpos()
        } else if let Some(fen) = setup.strip_prefix("fen") {
            Position::from_fen(fen.trim())?
        } else {
            return Err(ParseError::Placement(setup.to_string()));
        };
        if let Some(moves) = moves {
            let moves: Vec<&str> = moves.split_whitespace().collect();
            pos.apply_uci_moves(&moves)?;
        }
        self.pos = pos;
        Ok(())
    }

    pub fn cmd_go(&mut self, args: &str) -> Result<(), SearchError> {
        if self.is_searching() { return Err(SearchError::AlreadyRunning); }
        // Reap a search that already reported its best move
        if let Some(mut done) = self.search.take() { done.join()?; }
        let mode = SearchMode::from_go(args);
        debug!("go: {mode:?}");
        let listener = UciListener::new(self.output());
        self.search = Some(Search::new(self.pos.clone(), mode).start(listener)?);
        Ok(())
    }

    fn stop_search(&mut self) {
        if let Some(mut search) = self.search.take() {
            if let Err(e) = search.stop() { warn!("{e}"); }
        }
    }

    fn cmd_ponderhit(&self) {
        if let Some(search) = &self.search { search.ponderhit(); }
    }

    /// Handles one protocol line. Returns `false` on `quit`.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match cmd {
            "" => {}
            "uci" => self.cmd_uci(),
            "isready" => self.send("readyok"),
            "ucinewgame" => self.cmd_ucinewgame(),
            "position" => {
                if let Err(e) = self.cmd_position(rest) { warn!("rejected position: {e}"); }
            }
            "go" => {
                if let Err(e) = self.cmd_go(rest) { warn!("rejected go: {e}"); }
            }
            "stop" => self.stop_search(),
            "ponderhit" => self.cmd_ponderhit(),
            "quit" => {
                self.stop_search();
                return false;
            }
            other => warn!("unknown command '{other}'"),
        }
        true
    }

    pub fn run_loop<R: BufRead>(&mut self, input: R) {
        for line in input.lines() {
            let line = match line { Ok(s) => s, Err(_) => break };
            if !self.handle_line(&line) { return; }
        }
        self.stop_search();
    }
}
