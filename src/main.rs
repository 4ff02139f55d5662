//! Page widgets entry point
//!
//! Wires the four widgets to the page: clock, countdown timers,
//! slideshow, and the bouncing blocks. Each widget is set up
//! independently; a widget whose host elements are missing or whose
//! environment is unusable is disabled with a visible notice while the
//! others keep running.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent, Window};

    use page_widgets::clock::{CLOCK_ERROR_TEXT, format_clock};
    use page_widgets::consts::*;
    use page_widgets::countdown::{Countdown, FALLBACK_TIME};
    use page_widgets::dom;
    use page_widgets::error::HostError;
    use page_widgets::settings::Settings;
    use page_widgets::sim::{BlockField, FieldConfig, Viewport, tick};
    use page_widgets::slideshow::Slideshow;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Page widgets starting...");

        let window = match dom::window() {
            Ok(w) => w,
            Err(e) => {
                log::error!("Cannot start: {e}");
                return;
            }
        };
        let document = match dom::document(&window) {
            Ok(d) => d,
            Err(e) => {
                log::error!("Cannot start: {e}");
                return;
            }
        };

        let settings = Settings::load(&document).normalized();

        if let Err(e) = setup_clock(&window, &document, &settings) {
            log::error!("Clock setup failed: {e}");
            dom::show_error_banner(&window, &document, &format!("Clock unavailable: {e}"));
        }
        if let Err(e) = setup_timers(&window, &document, &settings) {
            log::error!("Countdown setup failed: {e}");
            dom::show_error_banner(&window, &document, &format!("Timers unavailable: {e}"));
        }
        if let Err(e) = setup_slideshow(&window, &document, &settings) {
            log::error!("Slideshow setup failed: {e}");
            dom::show_error_banner(&window, &document, &format!("Slideshow unavailable: {e}"));
        }
        if let Err(e) = setup_bouncer(&window, &document, settings) {
            log::error!("Bouncing blocks setup failed: {e}");
            dom::show_error_banner(&window, &document, &format!("Animation unavailable: {e}"));
        }

        log::info!("Page widgets running");
    }

    // === Clock ===

    fn setup_clock(
        window: &Window,
        document: &Document,
        settings: &Settings,
    ) -> Result<(), HostError> {
        if document.get_element_by_id("clock").is_none() {
            return Err(HostError::MissingElement("clock".into()));
        }

        let doc = document.clone();
        let mut warned_missing = false;
        let mut update = move || {
            let Some(element) = doc.get_element_by_id("clock") else {
                if !warned_missing {
                    log::warn!("Clock element removed from document, skipping updates");
                    warned_missing = true;
                }
                return;
            };
            let now = js_sys::Date::new_0();
            if now.get_time().is_nan() {
                log::error!("Host clock returned an invalid date");
                element.set_text_content(Some(CLOCK_ERROR_TEXT));
                element.set_class_name("error");
                return;
            }
            let text = format_clock(now.get_hours(), now.get_minutes(), now.get_seconds());
            element.set_text_content(Some(&text));
        };

        update();
        let closure = Closure::<dyn FnMut()>::new(update);
        dom::set_interval(window, closure, settings.clock_interval_ms)?;
        log::info!("Clock running");
        Ok(())
    }

    // === Countdown timers ===

    fn setup_timers(
        window: &Window,
        document: &Document,
        settings: &Settings,
    ) -> Result<(), HostError> {
        let list = document
            .query_selector_all(".timer")
            .map_err(|_| HostError::MissingElement(".timer".into()))?;
        if list.length() == 0 {
            log::info!("No countdown timers on this page");
            return Ok(());
        }

        let mut started = 0;
        for i in 0..list.length() {
            let Some(element) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            match setup_one_timer(window, document, &element, settings) {
                Ok(()) => started += 1,
                Err(e) => {
                    log::error!("Timer {i} setup failed: {e}");
                    dom::show_widget_error(window, document, &element, "Timer interface incomplete");
                }
            }
        }
        log::info!("{started} countdown timer(s) running");
        Ok(())
    }

    fn setup_one_timer(
        window: &Window,
        document: &Document,
        element: &Element,
        settings: &Settings,
    ) -> Result<(), HostError> {
        let display = query_child(element, ".time-display")?;
        let start_btn = query_child(element, ".start")?;
        let stop_btn = query_child(element, ".stop")?;
        let reset_btn = query_child(element, ".reset")?;

        let countdown = match Countdown::from_attrs(
            element.get_attribute("data-hours"),
            element.get_attribute("data-minutes"),
            element.get_attribute("data-seconds"),
        ) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid timer configuration ({e}), falling back to 1 minute");
                dom::show_widget_error(window, document, element, "Invalid timer configuration");
                Countdown::new(FALLBACK_TIME)
            }
        };
        let countdown = Rc::new(RefCell::new(countdown));

        render_countdown(&display, &countdown.borrow());

        // One interval per widget; stopped timers keep their schedule
        // and simply skip the decrement, so resuming needs no restart
        {
            let countdown = countdown.clone();
            let display = display.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut c = countdown.borrow_mut();
                let was_finished = c.is_finished();
                c.tick();
                render_countdown(&display, &c);
                if c.is_finished() && !was_finished {
                    log::info!("Countdown finished");
                }
            });
            dom::set_interval(window, closure, settings.countdown_interval_ms)?;
        }

        on_click(&start_btn, {
            let countdown = countdown.clone();
            let display = display.clone();
            move || {
                countdown.borrow_mut().start();
                render_countdown(&display, &countdown.borrow());
            }
        });
        on_click(&stop_btn, {
            let countdown = countdown.clone();
            move || countdown.borrow_mut().stop()
        });
        on_click(&reset_btn, {
            let countdown = countdown.clone();
            let display = display.clone();
            move || {
                countdown.borrow_mut().reset();
                render_countdown(&display, &countdown.borrow());
            }
        });

        Ok(())
    }

    fn render_countdown(display: &Element, countdown: &Countdown) {
        display.set_text_content(Some(&countdown.display()));
        let classes = display.class_list();
        if countdown.is_finished() {
            let _ = classes.add_1("finished");
        } else {
            let _ = classes.remove_1("finished");
        }
    }

    fn query_child(parent: &Element, selector: &str) -> Result<Element, HostError> {
        parent
            .query_selector(selector)
            .ok()
            .flatten()
            .ok_or_else(|| HostError::MissingElement(selector.into()))
    }

    fn on_click(element: &Element, mut handler: impl FnMut() + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // === Slideshow ===

    fn setup_slideshow(
        window: &Window,
        document: &Document,
        settings: &Settings,
    ) -> Result<(), HostError> {
        let list = document
            .query_selector_all("#slideshow img")
            .map_err(|_| HostError::MissingElement("#slideshow img".into()))?;

        let slides: Vec<Element> = (0..list.length())
            .filter_map(|i| list.get(i).and_then(|n| n.dyn_into::<Element>().ok()))
            .collect();
        if slides.is_empty() {
            log::warn!("Slideshow has no images, widget disabled");
            return Ok(());
        }

        let mut slideshow = Slideshow::new(slides.len());
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(change) = slideshow.advance() else {
                return;
            };
            // A detached image just misses its class flip; the rotation
            // itself keeps going
            let _ = slides[change.deactivate].class_list().remove_1("active");
            let _ = slides[change.activate].class_list().add_1("active");
        });
        dom::set_interval(window, closure, settings.slide_interval_ms)?;

        log::info!("Slideshow rotating every {}ms", settings.slide_interval_ms);
        Ok(())
    }

    // === Bouncing blocks ===

    /// The motion controller plus its display elements. Owns every
    /// `div.block` it creates and releases them all on cleanup.
    struct Bouncer {
        field: BlockField,
        elements: Vec<(u32, HtmlElement)>,
        settings: Settings,
        running: bool,
        raf_handle: Option<i32>,
        retry_pending: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Bouncer {
        fn new(
            window: &Window,
            document: &Document,
            settings: Settings,
        ) -> Result<Self, HostError> {
            dom::body(document)?;
            let viewport = dom::viewport_size(window, document)?;
            if !viewport.fits(settings.block_size) {
                return Err(HostError::ViewportTooSmall {
                    width: viewport.width,
                    height: viewport.height,
                    size: settings.block_size,
                });
            }

            let seed = js_sys::Date::now() as u64;
            let config = FieldConfig {
                block_size: settings.block_size,
                min_blocks: settings.min_blocks,
                max_blocks: settings.max_blocks,
                palette_len: settings.palette.len(),
            };
            let mut bouncer = Self {
                field: BlockField::new(seed, config),
                elements: Vec::new(),
                settings,
                running: true,
                raf_handle: None,
                retry_pending: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            };
            log::info!("Block field initialized with seed: {seed}");

            for _ in 0..bouncer.settings.initial_blocks {
                bouncer.add_block(window, document);
            }
            bouncer.update_stats(document);
            Ok(bouncer)
        }

        /// Spawn a block and its display element; a rejected spawn at
        /// the configured maximum is a warning, not an error
        fn add_block(&mut self, window: &Window, document: &Document) {
            let viewport = match dom::viewport_size(window, document) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Cannot add block: {e}");
                    return;
                }
            };
            let (id, x, y, color_index) = match self.field.spawn_block(viewport) {
                Ok(block) => (block.id, block.pos.x, block.pos.y, block.color_index),
                Err(e) => {
                    log::warn!("{e}");
                    return;
                }
            };
            let color = &self.settings.palette[color_index % self.settings.palette.len()];
            match dom::create_block_element(document, color, self.settings.block_size) {
                Ok(element) => {
                    dom::place_block(&element, x, y);
                    if let Ok(body) = dom::body(document) {
                        let _ = body.append_child(&element);
                    }
                    self.elements.push((id, element));
                }
                Err(e) => {
                    // Roll back the spawn so logical and display state agree
                    log::error!("Failed to create block element: {e}");
                    let _ = self.field.remove_block();
                }
            }
            self.update_stats(document);
        }

        /// Remove the newest block and release its display element; a
        /// rejected removal at the configured minimum is a warning
        fn remove_block(&mut self, document: &Document) {
            match self.field.remove_block() {
                Ok(block) => {
                    if let Some(index) = self.elements.iter().position(|(id, _)| *id == block.id) {
                        let (_, element) = self.elements.swap_remove(index);
                        dom::remove_element(&element);
                    }
                }
                Err(e) => log::warn!("{e}"),
            }
            self.update_stats(document);
        }

        /// One animation frame: advance the simulation against the
        /// freshly-read viewport, then sync every display element
        fn frame(
            &mut self,
            window: &Window,
            document: &Document,
            time: f64,
        ) -> Result<(), HostError> {
            let viewport = dom::viewport_size(window, document)?;
            if let Err(e) = tick(&mut self.field, viewport, self.settings.step()) {
                log::warn!("Skipping tick: {e}");
                return Ok(());
            }

            for (id, element) in &self.elements {
                // An element detached behind our back misses this frame
                // without aborting the others
                if !element.is_connected() {
                    continue;
                }
                if let Some(block) = self.field.blocks().iter().find(|b| b.id == *id) {
                    dom::place_block(element, block.pos.x, block.pos.y);
                }
            }

            self.track_fps(time);
            self.update_stats(document);
            Ok(())
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn toggle_pause(&mut self) {
            self.field.toggle_pause();
            log::info!(
                "Animation {}",
                if self.field.is_paused() { "paused" } else { "resumed" }
            );
        }

        fn change_speed(&mut self, document: &Document) {
            self.settings.cycle_speed();
            self.update_stats(document);
        }

        fn update_stats(&self, document: &Document) {
            dom::set_text_by_id(document, "blockCount", &self.field.len().to_string());
            dom::set_text_by_id(document, "speedValue", &self.settings.speed.to_string());
            if self.settings.show_fps {
                dom::set_text_by_id(document, "fpsValue", &self.fps.to_string());
            }
        }

        /// Stop scheduling and release every display element. No frame
        /// runs after this.
        fn cleanup(&mut self, window: &Window) {
            self.running = false;
            if let Some(handle) = self.raf_handle.take() {
                let _ = window.cancel_animation_frame(handle);
            }
            for (_, element) in self.elements.drain(..) {
                dom::remove_element(&element);
            }
            self.field.clear();
            log::info!("Bouncing blocks stopped and cleaned up");
        }
    }

    fn setup_bouncer(
        window: &Window,
        document: &Document,
        settings: Settings,
    ) -> Result<(), HostError> {
        let bouncer = Rc::new(RefCell::new(Bouncer::new(window, document, settings)?));

        setup_bouncer_controls(&bouncer, document);
        setup_auto_pause(&bouncer, document);
        setup_unload_cleanup(&bouncer, window);

        request_frame(bouncer.clone())?;
        log::info!(
            "Bouncing blocks running with {} block(s)",
            bouncer.borrow().field.len()
        );
        Ok(())
    }

    fn request_frame(bouncer: Rc<RefCell<Bouncer>>) -> Result<(), HostError> {
        let window = dom::window()?;
        let inner = bouncer.clone();
        let closure = Closure::once(move |time: f64| frame_loop(inner, time));
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|_| HostError::Schedule("requestAnimationFrame"))?;
        closure.forget();
        bouncer.borrow_mut().raf_handle = Some(handle);
        Ok(())
    }

    fn frame_loop(bouncer: Rc<RefCell<Bouncer>>, time: f64) {
        {
            let mut b = bouncer.borrow_mut();
            if !b.running {
                return;
            }
            let window = match dom::window() {
                Ok(w) => w,
                Err(e) => {
                    log::error!("{e}");
                    return;
                }
            };
            let document = match dom::document(&window) {
                Ok(d) => d,
                Err(e) => {
                    log::error!("{e}");
                    return;
                }
            };

            if let Err(e) = b.frame(&window, &document, time) {
                log::error!("Animation frame failed: {e}");
                // Transient failure: hold position updates and try again
                // shortly; the frame schedule itself keeps running
                if !b.retry_pending {
                    b.retry_pending = true;
                    b.field.pause();
                    schedule_resume(bouncer.clone(), &window);
                }
            }
        }

        if let Err(e) = request_frame(bouncer) {
            log::error!("Lost animation frame scheduling: {e}");
        }
    }

    fn schedule_resume(bouncer: Rc<RefCell<Bouncer>>, window: &Window) {
        let closure = Closure::once(move || {
            let mut b = bouncer.borrow_mut();
            b.retry_pending = false;
            b.field.resume();
            log::info!("Resuming after transient frame failure");
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TICK_RETRY_DELAY_MS,
        );
        closure.forget();
    }

    fn setup_bouncer_controls(bouncer: &Rc<RefCell<Bouncer>>, document: &Document) {
        if let Some(btn) = document.get_element_by_id("addBlock") {
            let bouncer = bouncer.clone();
            on_click(&btn, move || {
                let Ok(window) = dom::window() else { return };
                let Ok(document) = dom::document(&window) else {
                    return;
                };
                bouncer.borrow_mut().add_block(&window, &document);
            });
        }
        if let Some(btn) = document.get_element_by_id("removeBlock") {
            let bouncer = bouncer.clone();
            on_click(&btn, move || {
                let Ok(window) = dom::window() else { return };
                let Ok(document) = dom::document(&window) else {
                    return;
                };
                bouncer.borrow_mut().remove_block(&document);
            });
        }
        if let Some(btn) = document.get_element_by_id("togglePause") {
            let bouncer = bouncer.clone();
            on_click(&btn, move || bouncer.borrow_mut().toggle_pause());
        }
        if let Some(btn) = document.get_element_by_id("changeSpeed") {
            let bouncer = bouncer.clone();
            on_click(&btn, move || {
                let Ok(window) = dom::window() else { return };
                let Ok(document) = dom::document(&window) else {
                    return;
                };
                bouncer.borrow_mut().change_speed(&document);
            });
        }
    }

    /// Pause while the tab is hidden, resume when it becomes visible
    fn setup_auto_pause(bouncer: &Rc<RefCell<Bouncer>>, document: &Document) {
        let bouncer = bouncer.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut b = bouncer.borrow_mut();
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                b.field.pause();
                log::info!("Auto-paused (tab hidden)");
            } else {
                b.field.resume();
                log::info!("Auto-resumed (tab visible)");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_unload_cleanup(bouncer: &Rc<RefCell<Bouncer>>, window: &Window) {
        let bouncer = bouncer.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Ok(window) = dom::window() {
                bouncer.borrow_mut().cleanup(&window);
            }
        });
        let _ = window
            .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Page widgets (native) starting...");
    log::info!("The widgets need a browser host - build with `trunk serve` for the web version");

    println!("\nRunning headless motion demo...");
    headless_motion_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_motion_demo() {
    use page_widgets::Settings;
    use page_widgets::sim::{BlockField, FieldConfig, Viewport, tick};

    let settings = Settings::load().normalized();
    let viewport = Viewport::new(800.0, 600.0);
    let config = FieldConfig {
        block_size: settings.block_size,
        min_blocks: settings.min_blocks,
        max_blocks: settings.max_blocks,
        palette_len: settings.palette.len(),
    };
    let mut field = BlockField::new(42, config);
    for _ in 0..settings.initial_blocks {
        field.spawn_block(viewport).expect("spawn failed");
    }
    for _ in 0..600 {
        tick(&mut field, viewport, settings.step()).expect("tick failed");
    }
    for block in field.blocks() {
        assert!(block.in_bounds(viewport), "block escaped the viewport");
        println!(
            "block {} at ({:.1}, {:.1})",
            block.id, block.pos.x, block.pos.y
        );
    }
    println!("✓ 600 ticks, all blocks stayed in bounds");
}
