use crate::scene::{Texture, TextureHandle};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("texture '{name}' was never loaded")]
    UnknownTexture { name: String },
    #[error("texture name is empty")]
    EmptyName,
}

/// Named texture handles. Loading registers a handle once; every lookup
/// of the same name returns the same shared texture.
#[derive(Debug, Default)]
pub struct TextureLibrary {
    textures: HashMap<String, TextureHandle>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    pub fn load(&mut self, name: &str) -> Result<TextureHandle, AssetError> {
        if name.is_empty() {
            return Err(AssetError::EmptyName);
        }
        let texture = self
            .textures
            .entry(name.to_string())
            .or_insert_with(|| {
                log::info!("Registered texture '{}'", name);
                Texture::image(name)
            });
        Ok(texture.clone())
    }

    pub fn get(&self, name: &str) -> Result<TextureHandle, AssetError> {
        self.textures
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::UnknownTexture {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{AssetError, TextureLibrary};
    use std::rc::Rc;

    #[test]
    fn loading_twice_returns_the_same_handle() {
        let mut library = TextureLibrary::new();
        let a = library.load("sky.hdr").unwrap();
        let b = library.load("sky.hdr").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn unknown_and_empty_names_are_errors() {
        let mut library = TextureLibrary::new();
        assert_eq!(
            library.get("missing.png").unwrap_err(),
            AssetError::UnknownTexture {
                name: "missing.png".to_string()
            }
        );
        assert_eq!(library.load("").unwrap_err(), AssetError::EmptyName);
    }
}
