//! Asynchronous image loading for textures.
//!
//! The browser decodes images in the background and reports through the
//! element's `load` / `error` events. [`load_image`] turns that into a future
//! resolved by a single-shot channel.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use gg_core::{GgError, Registered, Texture};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use crate::backend::WebGlBackend;

type Outcome = Result<(), String>;

/// Fetches and decodes `url`, resolving once the image is usable.
///
/// # Errors
///
/// Returns `GgError::Decode` if the element cannot be created or the
/// browser fails to load the image.
pub async fn load_image(url: &str) -> Result<HtmlImageElement, GgError> {
    let image =
        HtmlImageElement::new().map_err(|e| GgError::Decode(format!("{url}: {e:?}")))?;

    let (tx, rx) = oneshot::channel::<Outcome>();
    // Only the first of load/error may complete the future.
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load: Closure<dyn FnMut()> = {
        let tx = Rc::clone(&tx);
        Closure::once(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        })
    };
    let on_error: Closure<dyn FnMut()> = {
        let tx = Rc::clone(&tx);
        let url = url.to_string();
        Closure::once(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(format!("{url}: failed to load")));
            }
        })
    };

    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_cross_origin(Some(""));
    image.set_src(url);

    let outcome = rx.await;
    image.set_onload(None);
    image.set_onerror(None);
    drop(on_load);
    drop(on_error);

    match outcome {
        Ok(Ok(())) => {
            log::debug!(
                "gg: loaded {url} ({}x{})",
                image.natural_width(),
                image.natural_height()
            );
            Ok(image)
        }
        Ok(Err(msg)) => Err(GgError::Decode(msg)),
        Err(oneshot::Canceled) => Err(GgError::Decode(format!("{url}: load abandoned"))),
    }
}

/// Loads `url` and uploads it as a texture.
///
/// # Errors
///
/// Returns `GgError::Decode` if loading fails, or `GgError::Resource` if the
/// upload is rejected.
pub async fn load_texture(
    backend: Registered<'_, WebGlBackend>,
    url: &str,
) -> Result<Texture<WebGlBackend>, GgError> {
    let image = load_image(url).await?;
    Texture::upload(backend, image.natural_width(), image.natural_height(), &image)
}
