/// Reveals the newest narration one character at a time.
#[derive(Debug, Clone, Default)]
pub struct Typewriter {
    /// Which log entry is being revealed.
    entry: Option<usize>,
    total: usize,
    shown: usize,
    started_at: f64,
}

impl Typewriter {
    /// Start revealing log entry `entry` of `total` characters, unless it
    /// already is the current one.
    pub fn track(&mut self, entry: usize, text: &str, now: f64) {
        if self.entry == Some(entry) {
            return;
        }
        self.entry = Some(entry);
        self.total = text.chars().count();
        self.shown = self.total.min(1);
        self.started_at = now;
    }

    /// Per-frame driver: track the newest narration and advance it.
    pub fn follow(&mut self, latest: Option<(usize, &str)>, now: f64, per_char_secs: f64) {
        if let Some((entry, text)) = latest {
            self.track(entry, text, now);
            self.update(now, per_char_secs);
        }
    }

    pub fn update(&mut self, now: f64, per_char_secs: f64) {
        if per_char_secs <= 0.0 {
            self.shown = self.total;
            return;
        }
        let elapsed = (now - self.started_at).max(0.0);
        let count = (elapsed / per_char_secs) as usize + 1;
        self.shown = count.min(self.total);
    }

    pub fn skip(&mut self) {
        self.shown = self.total;
    }

    pub fn is_typing(&self) -> bool {
        self.shown < self.total
    }

    pub fn is_tracking(&self, entry: usize) -> bool {
        self.entry == Some(entry)
    }

    pub fn visible<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.shown) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}
