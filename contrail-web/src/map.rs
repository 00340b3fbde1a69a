//! Leaflet-backed implementation of the core map port.

use std::cell::RefCell;
use std::rc::Rc;

use contrail_game::{AirportMarker, MapView};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use yew::Callback;

use crate::dom;
use crate::leaflet;

/// Id of the element the map mounts into.
pub const MAP_CONTAINER_ID: &str = "map";

/// Label on every airport popup's action button.
pub const FLY_BUTTON_LABEL: &str = "Fly Here";

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OSM_MAX_ZOOM: u8 = 20;

const UNVISITED_ICON_CLASS: &str = "airport-icon airport-icon-unvisited";
const VISITED_ICON_CLASS: &str = "airport-icon airport-icon-visited";

/// What a marker's fly button asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyRequest {
    pub icao: String,
    pub consumption: i64,
}

struct MapInner {
    map: leaflet::Map,
    airport_layer: leaflet::FeatureGroup,
    fly_handler: RefCell<Option<Callback<FlyRequest>>>,
    // One closure per rendered marker, dropped wholesale when the marker set
    // is replaced so stale handlers cannot outlive their markers.
    click_handlers: RefCell<Vec<Closure<dyn FnMut()>>>,
}

/// Owns the Leaflet map plus the airport marker layer. Cloning is cheap and
/// every clone drives the same map instance.
#[derive(Clone)]
pub struct LeafletMap {
    inner: Rc<MapInner>,
}

impl LeafletMap {
    /// Mount a map into `container_id` and attach the OSM tile layer.
    #[must_use]
    pub fn mount(container_id: &str, center: (f64, f64), zoom: u8) -> Self {
        let map = leaflet::new_map(container_id);
        map.set_view(&leaflet::lat_lng(center.0, center.1), f64::from(zoom));

        let tile_options = to_js(&TileLayerOptions {
            max_zoom: OSM_MAX_ZOOM,
            attribution: OSM_ATTRIBUTION,
        });
        leaflet::new_tile_layer(OSM_TILE_URL, &tile_options).add_to(&map);

        let airport_layer = leaflet::new_feature_group();
        airport_layer.add_to(&map);

        Self {
            inner: Rc::new(MapInner {
                map,
                airport_layer,
                fly_handler: RefCell::new(None),
                click_handlers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Route fly-button clicks to `handler`. Buttons read the handler at
    /// click time, so markers rendered before this call still work.
    pub fn set_fly_handler(&self, handler: Callback<FlyRequest>) {
        *self.inner.fly_handler.borrow_mut() = Some(handler);
    }

    fn add_airport_marker(&self, airport: &AirportMarker) {
        let icon = leaflet::new_div_icon(&to_js(&DivIconOptions {
            class_name: UNVISITED_ICON_CLASS,
        }));
        let marker = leaflet::new_marker(
            &leaflet::lat_lng(airport.latitude, airport.longitude),
            &marker_options(&icon),
        );
        marker.add_to_layer(&self.inner.airport_layer);
        match self.fly_popup(airport) {
            Some(popup) => marker.bind_popup(&popup),
            None => {
                log::error!("could not build the fly popup for {}", airport.icao_code);
                marker.bind_popup_text(&airport.name);
            }
        }
    }

    /// Popup content for an unvisited airport. The fly button's click
    /// handler is attached here, exactly once for the marker's lifetime.
    fn fly_popup(&self, airport: &AirportMarker) -> Option<web_sys::Element> {
        let document = dom::document();
        let content = document.create_element("div").ok()?;
        content.set_class_name("airport-popup");

        let title = document.create_element("b").ok()?;
        title.set_text_content(Some(&airport.name));
        content.append_child(&title).ok()?;
        content.append_child(&document.create_element("br").ok()?.into()).ok()?;

        let button = document.create_element("button").ok()?;
        button.set_text_content(Some(FLY_BUTTON_LABEL));
        button.set_class_name("fly-button");
        button.set_attribute("type", "button").ok()?;
        button.set_attribute("data-icao", &airport.icao_code).ok()?;
        button
            .set_attribute("data-consumption", &airport.consumption.to_string())
            .ok()?;
        button
            .set_attribute(
                "title",
                &format!(
                    "Fly to {} for {} CO2 points",
                    airport.icao_code, airport.consumption
                ),
            )
            .ok()?;

        let request = FlyRequest {
            icao: airport.icao_code.clone(),
            consumption: airport.consumption,
        };
        let inner = Rc::downgrade(&self.inner);
        let onclick = Closure::<dyn FnMut()>::new(move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let handler = inner.fly_handler.borrow().clone();
            match handler {
                Some(handler) => handler.emit(request.clone()),
                None => log::warn!("fly button clicked before a handler was wired"),
            }
        });
        button
            .dyn_ref::<web_sys::HtmlElement>()?
            .set_onclick(Some(onclick.as_ref().unchecked_ref()));
        self.inner.click_handlers.borrow_mut().push(onclick);

        content.append_child(&button).ok()?;
        Some(content)
    }
}

impl MapView for LeafletMap {
    fn render_airports(&self, airports: &[AirportMarker]) {
        self.inner.airport_layer.clear_layers();
        self.inner.click_handlers.borrow_mut().clear();
        for airport in airports {
            self.add_airport_marker(airport);
        }
    }

    fn fly_to(&self, latitude: f64, longitude: f64, zoom: u8) {
        self.inner
            .map
            .fly_to(&leaflet::lat_lng(latitude, longitude), f64::from(zoom));
    }

    fn place_visited_marker(&self, name: &str, latitude: f64, longitude: f64) {
        let icon = leaflet::new_div_icon(&to_js(&DivIconOptions {
            class_name: VISITED_ICON_CLASS,
        }));
        let marker = leaflet::new_marker(
            &leaflet::lat_lng(latitude, longitude),
            &marker_options(&icon),
        );
        // Added to the map itself, not the airport layer: the visited trail
        // survives marker-set replacement.
        marker.add_to(&self.inner.map);
        match visited_popup(name) {
            Some(popup) => marker.bind_popup(&popup),
            None => marker.bind_popup_text(name),
        }
        marker.open_popup();
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileLayerOptions<'a> {
    max_zoom: u8,
    attribution: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DivIconOptions<'a> {
    class_name: &'a str,
}

fn to_js<T: Serialize>(options: &T) -> JsValue {
    serde_wasm_bindgen::to_value(options).unwrap_or(JsValue::UNDEFINED)
}

fn marker_options(icon: &leaflet::DivIcon) -> JsValue {
    let options = js_sys::Object::new();
    if js_sys::Reflect::set(&options, &JsValue::from_str("icon"), icon.as_ref()).is_err() {
        log::error!("could not attach the marker icon");
    }
    options.into()
}

fn visited_popup(name: &str) -> Option<web_sys::Element> {
    let document = dom::document();
    let content = document.create_element("span").ok()?;
    content.append_with_str_1("You are here: ").ok()?;
    let emphasis = document.create_element("b").ok()?;
    emphasis.set_text_content(Some(name));
    content.append_child(&emphasis).ok()?;
    Some(content)
}
