//! Porter suffix-stripping stemmer.
//!
//! Implements the five steps of Porter's 1980 algorithm, including the later
//! `bli -> ble` and `logi -> log` revisions. Only ASCII words are stemmed;
//! anything else comes back lowercased and untouched.

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    pub fn stem(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.len() <= 2 || !lower.is_ascii() {
            return lower;
        }

        let mut w = Word {
            b: lower.into_bytes(),
        };
        w.step1a();
        w.step1b();
        w.step1c();
        w.step2();
        w.step3();
        w.step4();
        w.step5a();
        w.step5b();

        String::from_utf8_lossy(&w.b).into_owned()
    }
}

struct Word {
    b: Vec<u8>,
}

impl Word {
    fn is_consonant(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of VC sequences in `b[..len]`.
    fn measure(&self, len: usize) -> usize {
        let mut i = 0;
        let mut m = 0;
        while i < len && self.is_consonant(i) {
            i += 1;
        }
        loop {
            while i < len && !self.is_consonant(i) {
                i += 1;
            }
            if i >= len {
                return m;
            }
            while i < len && self.is_consonant(i) {
                i += 1;
            }
            m += 1;
            if i >= len {
                return m;
            }
        }
    }

    fn has_vowel(&self, len: usize) -> bool {
        (0..len).any(|i| !self.is_consonant(i))
    }

    fn ends_double_consonant(&self, len: usize) -> bool {
        len >= 2 && self.b[len - 1] == self.b[len - 2] && self.is_consonant(len - 1)
    }

    /// consonant-vowel-consonant ending where the last consonant is not w, x or y
    fn ends_cvc(&self, len: usize) -> bool {
        len >= 3
            && self.is_consonant(len - 3)
            && !self.is_consonant(len - 2)
            && self.is_consonant(len - 1)
            && !matches!(self.b[len - 1], b'w' | b'x' | b'y')
    }

    fn ends_with(&self, suffix: &str) -> bool {
        self.b.ends_with(suffix.as_bytes())
    }

    fn stem_len(&self, suffix: &str) -> usize {
        self.b.len() - suffix.len()
    }

    fn replace(&mut self, suffix: &str, replacement: &str) {
        let stem = self.stem_len(suffix);
        self.b.truncate(stem);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    /// Applies the first rule whose suffix matches, provided the remaining
    /// stem measures more than `min_measure`. Later rules are never tried
    /// once a suffix has matched.
    fn apply_rules(&mut self, rules: &[(&str, &str)], min_measure: usize) {
        if let Some((suffix, replacement)) = rules.iter().find(|(s, _)| self.ends_with(s)) {
            if self.measure(self.stem_len(suffix)) > min_measure {
                self.replace(suffix, replacement);
            }
        }
    }

    fn step1a(&mut self) {
        if self.ends_with("sses") {
            self.replace("sses", "ss");
        } else if self.ends_with("ies") {
            self.replace("ies", "i");
        } else if self.ends_with("s") && !self.ends_with("ss") {
            self.replace("s", "");
        }
    }

    fn step1b(&mut self) {
        if self.ends_with("eed") {
            if self.measure(self.stem_len("eed")) > 0 {
                self.replace("eed", "ee");
            }
            return;
        }

        let trimmed = ["ed", "ing"]
            .into_iter()
            .find(|suffix| self.ends_with(suffix) && self.has_vowel(self.stem_len(suffix)));
        let Some(suffix) = trimmed else {
            return;
        };
        self.replace(suffix, "");

        let len = self.b.len();
        if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
            self.b.push(b'e');
        } else if self.ends_double_consonant(len) && !matches!(self.b[len - 1], b'l' | b's' | b'z') {
            self.b.pop();
        } else if self.measure(len) == 1 && self.ends_cvc(len) {
            self.b.push(b'e');
        }
    }

    fn step1c(&mut self) {
        if self.ends_with("y") && self.has_vowel(self.stem_len("y")) {
            self.replace("y", "i");
        }
    }

    fn step2(&mut self) {
        const RULES: &[(&str, &str)] = &[
            ("ational", "ate"),
            ("tional", "tion"),
            ("enci", "ence"),
            ("anci", "ance"),
            ("izer", "ize"),
            ("bli", "ble"),
            ("alli", "al"),
            ("entli", "ent"),
            ("eli", "e"),
            ("ousli", "ous"),
            ("ization", "ize"),
            ("ation", "ate"),
            ("ator", "ate"),
            ("alism", "al"),
            ("iveness", "ive"),
            ("fulness", "ful"),
            ("ousness", "ous"),
            ("aliti", "al"),
            ("iviti", "ive"),
            ("biliti", "ble"),
            ("logi", "log"),
        ];
        self.apply_rules(RULES, 0);
    }

    fn step3(&mut self) {
        const RULES: &[(&str, &str)] = &[
            ("icate", "ic"),
            ("ative", ""),
            ("alize", "al"),
            ("iciti", "ic"),
            ("ical", "ic"),
            ("ful", ""),
            ("ness", ""),
        ];
        self.apply_rules(RULES, 0);
    }

    fn step4(&mut self) {
        const SUFFIXES: &[&str] = &[
            "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion",
            "ou", "ism", "ate", "iti", "ous", "ive", "ize",
        ];
        let matched = SUFFIXES.iter().find(|suffix| {
            if !self.ends_with(suffix) {
                return false;
            }
            if **suffix == "ion" {
                let stem = self.stem_len(suffix);
                return stem > 0 && matches!(self.b[stem - 1], b's' | b't');
            }
            true
        });
        if let Some(suffix) = matched {
            if self.measure(self.stem_len(suffix)) > 1 {
                self.replace(suffix, "");
            }
        }
    }

    fn step5a(&mut self) {
        if !self.ends_with("e") {
            return;
        }
        let stem = self.stem_len("e");
        let m = self.measure(stem);
        if m > 1 || (m == 1 && !self.ends_cvc(stem)) {
            self.b.truncate(stem);
        }
    }

    fn step5b(&mut self) {
        let len = self.b.len();
        if self.measure(len) > 1 && self.ends_double_consonant(len) && self.ends_with("l") {
            self.b.pop();
        }
    }
}
