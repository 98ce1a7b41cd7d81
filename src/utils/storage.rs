use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;

/// Almacenamiento clave/valor de strings (la forma de `window.localStorage`).
///
/// Todas las operaciones toman `&self`: el storage del navegador es
/// compartido y mutable por naturaleza.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    /// Borra todas las claves
    fn clear(&self) -> Result<(), StorageError>;
}

pub fn save_to_storage<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStorage + ?Sized,
    T: Serialize,
{
    let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
    storage.set_item(key, &json)
}

/// `None` si la clave no existe, el storage falla o el JSON no parsea
pub fn load_from_storage<S, T>(storage: &S, key: &str) -> Option<T>
where
    S: KeyValueStorage + ?Sized,
    T: DeserializeOwned,
{
    let json = storage.get_item(key).ok()??;
    serde_json::from_str(&json).ok()
}

/// Storage en memoria. Clonar comparte el mismo mapa, así un test puede
/// inspeccionar lo que el código bajo prueba escribió.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simula un storage lleno o bloqueado: escrituras y borrados fallan
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write(key.to_string()));
        }
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Remove(key.to_string()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Remove("*".to_string()));
        }
        self.items.borrow_mut().clear();
        Ok(())
    }
}

#[cfg(feature = "web")]
pub use local::{PageStorage, WebStorage};

#[cfg(feature = "web")]
mod local {
    use web_sys::{window, Storage};

    use super::{KeyValueStorage, MemoryStorage};
    use crate::error::StorageError;

    /// Storage de la página: el del navegador si existe, memoria si el
    /// navegador lo bloquea (modo privado, cookies desactivadas...)
    #[derive(Clone)]
    pub enum PageStorage {
        Web(WebStorage),
        Memory(MemoryStorage),
    }

    impl PageStorage {
        /// `window.localStorage`
        pub fn open() -> Self {
            Self::or_memory(WebStorage::local(), "el estado de auth no persistirá")
        }

        /// `window.sessionStorage`
        pub fn open_session() -> Self {
            Self::or_memory(WebStorage::session(), "sessionStorage en memoria")
        }

        fn or_memory(opened: Result<WebStorage, StorageError>, consequence: &str) -> Self {
            match opened {
                Ok(storage) => Self::Web(storage),
                Err(e) => {
                    log::warn!("⚠️ [STORAGE] {}, {}", e, consequence);
                    Self::Memory(MemoryStorage::new())
                }
            }
        }
    }

    impl KeyValueStorage for PageStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            match self {
                Self::Web(storage) => storage.get_item(key),
                Self::Memory(storage) => storage.get_item(key),
            }
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                Self::Web(storage) => storage.set_item(key, value),
                Self::Memory(storage) => storage.set_item(key, value),
            }
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            match self {
                Self::Web(storage) => storage.remove_item(key),
                Self::Memory(storage) => storage.remove_item(key),
            }
        }

        fn clear(&self) -> Result<(), StorageError> {
            match self {
                Self::Web(storage) => storage.clear(),
                Self::Memory(storage) => storage.clear(),
            }
        }
    }

    /// `window.localStorage` o `window.sessionStorage`
    #[derive(Clone)]
    pub struct WebStorage {
        storage: Storage,
    }

    impl WebStorage {
        pub fn local() -> Result<Self, StorageError> {
            let storage = window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)?;
            Ok(Self { storage })
        }

        pub fn session() -> Result<Self, StorageError> {
            let storage = window()
                .and_then(|w| w.session_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStorage for WebStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|_| StorageError::Unavailable)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|_| StorageError::Write(key.to_string()))
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|_| StorageError::Remove(key.to_string()))
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.storage
                .clear()
                .map_err(|_| StorageError::Remove("*".to_string()))
        }
    }
}
