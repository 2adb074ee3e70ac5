use ratatui::style::{Color as TuiColor, Style};
use ratatui::text::{Line, Span};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

const SYNTECT_THEME: &str = "base16-ocean.dark";
const CACHE_CAPACITY: usize = 64;

// Streaming redraws the same blocks every frame; keep recent results.
// key = (normalized language, hash of code)
struct SimpleCache {
    map: HashMap<(String, u64), Vec<Line<'static>>>,
    order: VecDeque<(String, u64)>,
    cap: usize,
}

impl SimpleCache {
    fn new(cap: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn get(&self, k: &(String, u64)) -> Option<Vec<Line<'static>>> {
        self.map.get(k).cloned()
    }

    fn put(&mut self, k: (String, u64), v: Vec<Line<'static>>) {
        if !self.map.contains_key(&k) {
            self.order.push_back(k.clone());
        }
        self.map.insert(k, v);
        while self.map.len() > self.cap {
            match self.order.pop_front() {
                Some(old) => {
                    self.map.remove(&old);
                }
                None => break,
            }
        }
    }
}

static SYNTAX_CACHE: Mutex<Option<SimpleCache>> = Mutex::new(None);

fn hash_code(lang: &str, code: &str, bg: Option<TuiColor>) -> u64 {
    let mut hasher = DefaultHasher::new();
    lang.hash(&mut hasher);
    code.hash(&mut hasher);
    format!("{bg:?}").hash(&mut hasher);
    hasher.finish()
}

pub(crate) fn normalize_lang_hint(s: &str) -> String {
    let t = s.trim().to_ascii_lowercase();
    match t.as_str() {
        "py" | "python" => "python".into(),
        "bash" | "sh" | "zsh" | "shell" => "bash".into(),
        "js" | "javascript" | "jsx" => "javascript".into(),
        "ts" | "tsx" | "typescript" => "typescript".into(),
        "yaml" | "yml" => "yaml".into(),
        "rust" | "rs" => "rust".into(),
        "lua" | "luau" => "lua".into(),
        "c" | "h" => "c".into(),
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" => "cpp".into(),
        "kotlin" | "kt" => "kotlin".into(),
        other => other.into(),
    }
}

fn to_tui_color(c: syntect::highlighting::Color) -> TuiColor {
    TuiColor::Rgb(c.r, c.g, c.b)
}

/// Highlight a code block into styled lines.
///
/// Returns `None` when highlighting fails; callers fall back to plain lines.
/// Unknown languages are highlighted as plain text.
pub fn highlight_code_block(
    lang_hint: &str,
    code: &str,
    bg: Option<TuiColor>,
) -> Option<Vec<Line<'static>>> {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    let ps = SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines);
    let ts = THEME_SET.get_or_init(ThemeSet::load_defaults);
    let syn_theme = ts.themes.get(SYNTECT_THEME)?;

    let lang_norm = normalize_lang_hint(lang_hint);
    let key = (lang_norm.clone(), hash_code(&lang_norm, code, bg));
    if let Ok(guard) = SYNTAX_CACHE.lock() {
        if let Some(lines) = guard.as_ref().and_then(|cache| cache.get(&key)) {
            return Some(lines);
        }
    }

    let syntax = ps
        .find_syntax_by_token(&lang_norm)
        .unwrap_or_else(|| ps.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, syn_theme);

    let mut out: Vec<Line<'static>> = Vec::new();
    for line in syntect::util::LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, ps).ok()?;
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| {
                let frag = text.strip_suffix('\n').unwrap_or(text);
                let frag = frag.strip_suffix('\r').unwrap_or(frag);
                let mut st = Style::default().fg(to_tui_color(style.foreground));
                if let Some(bgcol) = bg {
                    st = st.bg(bgcol);
                }
                Span::styled(frag.replace('\t', "    "), st)
            })
            .collect();
        out.push(Line::from(spans));
    }

    if let Ok(mut guard) = SYNTAX_CACHE.lock() {
        guard
            .get_or_insert_with(|| SimpleCache::new(CACHE_CAPACITY))
            .put(key, out.clone());
    }
    Some(out)
}
