use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// bcrypt hashing with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> Result<String, BcryptError> {
        hash(plain, self.cost)
    }

    pub fn verify(&self, plain: &str, hashed: &str) -> Result<bool, BcryptError> {
        verify(plain, hashed)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
