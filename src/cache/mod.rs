//! Generation Cache
//!
//! Records the outcome of the most recent generate-and-upload and
//! generate-recipe operations under fixed sentinel keys, so a lookup with an
//! unrecognized identifier can fall back to "the latest thing generated"
//! instead of erroring.
//!
//! Sentinel writes are last-write-wins with no versioning. A superseded
//! generation leaves its `recipe:<uuid>` entry behind as append-only
//! garbage; that is accepted behavior.

use crate::error::{ApiError, StorageError};
use crate::store::KeyValueStore;
use crate::types::{FoodInfo, GenerationRecord};
use std::sync::Arc;

const LATEST_UUID_KEY: &[u8] = b"latest_uuid";
const LATEST_URL_PATH_KEY: &[u8] = b"latest_url_path";
const LATEST_NAME_KEY: &[u8] = b"latest_name";
const RECIPE_KEY_PREFIX: &str = "recipe:";

/// Fixed fallback content, also served by the fake generation modes.
pub const FALLBACK_UUID: &str = "c08af7a7-421b-4b36-b081-e22573eb7b57";
pub const FALLBACK_NAME: &str = "Sichuan hotpot";
pub const FALLBACK_URL_PATH: &str =
    "https://storage.cloud.google.com/omni-meme-food-factory/c08af7a7-421b-4b36-b081-e22573eb7b57.png";
pub const FALLBACK_RECIPE: &str = "Recipe for Creating a White Cat Watermark Meme\n\nIngredients:\n\n1. Basic knowledge of Photoshop or any other image editing software\n2. High-resolution image of a white cat\n3. A funny or interesting caption or quote\n4. Watermark (Your name, brand, or logo)\n\nInstructions\n\n1. First, find or take a high-resolution picture of a white cat. The image should be clear. The cat can be in any pose that you find entertaining or relevant to the caption you have in mind.\n\n2. Next, use your knowledge of Photoshop or any image editing software to prepare the image. Open the image in the application, adjust the brightness, contrast, and clarity to enhance the image quality.\n\n3. After editing the primary image, the next step is to add the meme text. This should be something funny or engaging related to the expression or the posture of the cat in the image. Click on the text tool, place the cursor where you want the text to appear, and type your funny caption.\n\n4. Choose a font that is bold and easily readable. Opt for white text with black stroke, as it will ensure that the text is legible across a variety of backgrounds. Make sure the text is the right size, it should be big enough to read but not so big that it takes away from the image.\n\nHappy memeing!";

fn recipe_key(uuid: &str) -> Vec<u8> {
    format!("{}{}", RECIPE_KEY_PREFIX, uuid).into_bytes()
}

/// Most-recently-generated content over the key-value store.
pub struct GenerationCache {
    store: Arc<dyn KeyValueStore>,
}

impl GenerationCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the three latest-generation sentinels. There is no rollback
    /// coupling with a later recipe write: the cache can legitimately
    /// observe a generation that has no recipe yet.
    pub fn record_generation(&self, record: &GenerationRecord) -> Result<(), ApiError> {
        self.store.put(LATEST_UUID_KEY, record.uuid.as_bytes())?;
        self.store
            .put(LATEST_URL_PATH_KEY, record.url_path.as_bytes())?;
        self.store.put(LATEST_NAME_KEY, record.name.as_bytes())?;
        Ok(())
    }

    /// Store recipe text under `recipe:<uuid>`. Only reachable through the
    /// latest-generation fallback while `uuid` is still the latest.
    pub fn record_recipe(&self, uuid: &str, text: &str) -> Result<(), ApiError> {
        self.store.put(&recipe_key(uuid), text.as_bytes())?;
        Ok(())
    }

    /// The uuid of the latest generation, if any.
    pub fn latest_uuid(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .store
            .get(LATEST_UUID_KEY)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Store a pre-seeded info blob directly under the item's identifier.
    pub fn seed(&self, identifier: &str, info: &FoodInfo) -> Result<(), ApiError> {
        let encoded = serde_json::to_vec(info).map_err(StorageError::from)?;
        self.store.put(identifier.as_bytes(), &encoded)?;
        Ok(())
    }

    /// Resolve displayable info for `identifier`.
    ///
    /// Fallback chain: direct key lookup, then the latest-generation
    /// sentinels (all four entries must be present), then the fixed default
    /// record. Never an error beyond storage failure.
    pub fn lookup(&self, identifier: &str) -> Result<FoodInfo, ApiError> {
        if let Some(bytes) = self.store.get(identifier.as_bytes())? {
            if let Ok(info) = serde_json::from_slice::<FoodInfo>(&bytes) {
                return Ok(info);
            }
            tracing::warn!(identifier, "seeded blob is not valid JSON, falling back");
        }

        if let Some(info) = self.latest_generated()? {
            return Ok(info);
        }

        Ok(FoodInfo {
            name: FALLBACK_NAME.to_string(),
            url_path: FALLBACK_URL_PATH.to_string(),
            recipe: FALLBACK_RECIPE.to_string(),
        })
    }

    fn latest_generated(&self) -> Result<Option<FoodInfo>, ApiError> {
        let Some(uuid) = self.latest_uuid()? else {
            return Ok(None);
        };
        let Some(url_path) = self.store.get(LATEST_URL_PATH_KEY)? else {
            return Ok(None);
        };
        let Some(name) = self.store.get(LATEST_NAME_KEY)? else {
            return Ok(None);
        };
        let Some(recipe) = self.store.get(&recipe_key(&uuid))? else {
            return Ok(None);
        };

        Ok(Some(FoodInfo {
            name: String::from_utf8_lossy(&name).into_owned(),
            url_path: String::from_utf8_lossy(&url_path).into_owned(),
            recipe: String::from_utf8_lossy(&recipe).into_owned(),
        }))
    }
}
