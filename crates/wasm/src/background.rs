//! A scene running behind the page on a full-window canvas.
//!
//! The handle owns a self-scheduling `requestAnimationFrame` loop and a
//! window `resize` listener. Both callbacks share the animator through
//! `Rc<RefCell<_>>`; the browser never runs them concurrently.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{Animator, Extent};
use folio_scenes::SceneKind;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::canvas::CanvasSurface;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Host {
    animator: Animator<SceneKind, CanvasSurface>,
    /// Id of the pending animation frame, if any.
    frame_id: Option<i32>,
}

struct Running {
    window: Window,
    host: Rc<RefCell<Host>>,
    frame_callback: FrameCallback,
    resize_callback: Closure<dyn FnMut()>,
}

/// Handle to a running background. Inert if the canvas had no 2D context.
#[wasm_bindgen]
pub struct Background {
    running: Option<Running>,
}

fn window_extent(window: &Window) -> Option<Extent> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Extent::new(width, height).ok()
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}

fn schedule(window: &Window, callback: &FrameCallback) -> Option<i32> {
    let cb = callback.borrow();
    let id = window
        .request_animation_frame(cb.as_ref()?.as_ref().unchecked_ref())
        .ok();
    if id.is_none() {
        warn!("requestAnimationFrame failed, background halted");
    }
    id
}

#[wasm_bindgen]
impl Background {
    /// Sizes `canvas` to the window and starts `scene` on it.
    ///
    /// `params` is an optional JSON object of scene parameters. Fails for an
    /// unknown scene or invalid params; a missing 2D context yields an inert
    /// handle instead.
    pub fn start(
        canvas: HtmlCanvasElement,
        scene: &str,
        seed: u32,
        params: Option<String>,
    ) -> Result<Background, JsError> {
        let params: serde_json::Value = match params {
            Some(text) => serde_json::from_str(&text)?,
            None => serde_json::json!({}),
        };
        let Some(window) = web_sys::window() else {
            debug!("no window, background stays inert");
            return Ok(Background { running: None });
        };
        let extent = window_extent(&window).unwrap_or(Extent::new(300.0, 150.0)?);
        let kind = SceneKind::from_name(
            scene,
            extent.width() as usize,
            extent.height() as usize,
            seed as u64,
            &params,
        )?;

        let Some(surface) = CanvasSurface::new(canvas, extent) else {
            debug!("canvas has no 2D context, background stays inert");
            return Ok(Background { running: None });
        };

        let host = Rc::new(RefCell::new(Host {
            animator: Animator::start(kind, Some(surface)),
            frame_id: None,
        }));

        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        {
            let host = host.clone();
            let window = window.clone();
            let callback = frame_callback.clone();
            *frame_callback.borrow_mut() = Some(Closure::new(move |now: f64| {
                let mut h = host.borrow_mut();
                h.frame_id = None;
                if h.animator.frame(now) {
                    h.frame_id = schedule(&window, &callback);
                }
            }));
        }

        let resize_callback = {
            let host = host.clone();
            let window = window.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(extent) = window_extent(&window) {
                    let now = now_ms(&window);
                    host.borrow_mut().animator.request_resize(extent, now);
                }
            })
        };
        window
            .add_event_listener_with_callback("resize", resize_callback.as_ref().unchecked_ref())
            .map_err(|_| JsError::new("failed to register resize listener"))?;

        host.borrow_mut().frame_id = schedule(&window, &frame_callback);
        info!(scene, "background started");

        Ok(Background {
            running: Some(Running {
                window,
                host,
                frame_callback,
                resize_callback,
            }),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| r.host.borrow().animator.is_running())
    }

    /// Cancels the pending frame, removes the resize listener and releases
    /// the canvas. Further calls do nothing.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let mut host = running.host.borrow_mut();
        if let Some(id) = host.frame_id.take() {
            if running.window.cancel_animation_frame(id).is_err() {
                warn!("cancelAnimationFrame failed");
            }
        }
        if running
            .window
            .remove_event_listener_with_callback(
                "resize",
                running.resize_callback.as_ref().unchecked_ref(),
            )
            .is_err()
        {
            warn!("removing resize listener failed");
        }
        host.animator.stop();
        info!(frames = host.animator.frames(), "background stopped");
        drop(host);
        // breaks the callback's reference cycle through itself
        running.frame_callback.borrow_mut().take();
    }
}

impl Drop for Background {
    fn drop(&mut self) {
        self.stop();
    }
}
