use std::io;

use constant_time_eq::constant_time_eq;

/// Validates a USER/PASS pair.
pub trait Auth: Send + Sync {
    fn check_passwd(&self, username: &str, password: &str) -> io::Result<bool>;
}

/// Fixed single-account authenticator.
///
/// Both comparisons run in constant time once lengths match, so a remote
/// caller cannot probe the credentials byte by byte.
#[derive(Debug, Clone)]
pub struct SimpleAuth {
    pub name: String,
    pub password: String,
}

impl SimpleAuth {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        SimpleAuth {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl Auth for SimpleAuth {
    fn check_passwd(&self, username: &str, password: &str) -> io::Result<bool> {
        Ok(constant_time_equals(username, &self.name) && constant_time_equals(password, &self.password))
    }
}

fn constant_time_equals(a: &str, b: &str) -> bool {
    a.len() == b.len() && constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// Accepts any credentials. For anonymous servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Auth for NoAuth {
    fn check_passwd(&self, _username: &str, _password: &str) -> io::Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_auth_accepts_exact_pair() {
        let auth = SimpleAuth::new("admin", "admin");
        assert!(auth.check_passwd("admin", "admin").unwrap());
    }

    #[test]
    fn simple_auth_rejects_wrong_password() {
        let auth = SimpleAuth::new("admin", "admin");
        assert!(!auth.check_passwd("admin", "nimda").unwrap());
        assert!(!auth.check_passwd("admin", "").unwrap());
        assert!(!auth.check_passwd("admin", "admin1").unwrap());
    }

    #[test]
    fn simple_auth_rejects_wrong_username() {
        let auth = SimpleAuth::new("admin", "admin");
        assert!(!auth.check_passwd("root", "admin").unwrap());
    }

    #[test]
    fn no_auth_accepts_anything() {
        assert!(NoAuth.check_passwd("anonymous", "x").unwrap());
        assert!(NoAuth.check_passwd("", "").unwrap());
    }

    // Mean-difference bound rather than an exact one: an early-exit
    // comparison differs by orders of magnitude on a first-byte
    // mismatch, scheduler noise does not.
    #[test]
    fn equal_length_checks_take_comparable_time() {
        use std::hint::black_box;
        use std::time::Instant;

        let auth = SimpleAuth::new("admin", "correct-horse-battery");
        let right = "correct-horse-battery";
        let wrong = "xorrect-horse-battery";
        const ROUNDS: u32 = 50_000;

        let mean_secs = |candidate: &str| {
            let start = Instant::now();
            for _ in 0..ROUNDS {
                let _ = auth.check_passwd("admin", black_box(candidate)).unwrap();
            }
            start.elapsed().as_secs_f64() / f64::from(ROUNDS)
        };

        // Warm-up pass before measuring.
        mean_secs(right);
        mean_secs(wrong);

        let right_mean = mean_secs(right);
        let wrong_mean = mean_secs(wrong);
        let diff = (right_mean - wrong_mean).abs();
        let baseline = right_mean.max(wrong_mean);

        assert!(
            diff < baseline * 0.5,
            "correct {:.2e}s vs wrong {:.2e}s per check",
            right_mean,
            wrong_mean
        );
    }
}
