use crc32fast::Hasher;

/// Generate a stable seed from an editing-session name using CRC32.
pub fn session_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for blocks and items within an editing session.
///
/// Uniqueness is per session: the generator is the only id source for a
/// session's tree, so two ids it hands out never collide.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(session: &str) -> Self {
        Self {
            seed: session_seed(session),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential id.
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Fast-forward the counter past ids this generator's seed already
    /// produced, so a session resumed over an existing tree never hands
    /// out a colliding id.
    pub fn skip_past<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        let prefix = format!("{}-", self.seed);
        for id in existing {
            if let Some(suffix) = id.strip_prefix(&prefix) {
                if let Ok(count) = suffix.parse::<u32>() {
                    self.count = self.count.max(count);
                }
            }
        }
    }
}
