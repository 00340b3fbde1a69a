//! Hand-rolled bindings for the slice of Leaflet the map adapter drives.
//!
//! Leaflet ships with the page as a plain script tag, so these imports talk
//! to the global `L` namespace rather than an ES module.

use js_sys::Array;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// An `L.Map` instance.
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    pub fn new_map(container_id: &str) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64);

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &Map, center: &JsValue, zoom: f64);
}

#[wasm_bindgen]
extern "C" {
    /// An `L.TileLayer` instance.
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn new_tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &TileLayer, map: &Map);
}

#[wasm_bindgen]
extern "C" {
    /// An `L.FeatureGroup` instance. Clearing the group drops every layer
    /// added to it in one call.
    pub type FeatureGroup;

    #[wasm_bindgen(js_namespace = L, js_name = featureGroup)]
    pub fn new_feature_group() -> FeatureGroup;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &FeatureGroup, map: &Map);

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &FeatureGroup);
}

#[wasm_bindgen]
extern "C" {
    /// An `L.DivIcon` instance.
    pub type DivIcon;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    pub fn new_div_icon(options: &JsValue) -> DivIcon;
}

#[wasm_bindgen]
extern "C" {
    /// An `L.Marker` instance.
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn new_marker(coordinates: &JsValue, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &Map);

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to_layer(this: &Marker, group: &FeatureGroup);

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Marker, content: &web_sys::Element);

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup_text(this: &Marker, content: &str);

    #[wasm_bindgen(method, js_name = openPopup)]
    pub fn open_popup(this: &Marker);
}

/// Build the `[lat, lng]` pair Leaflet accepts wherever it wants a coordinate.
#[must_use]
pub fn lat_lng(latitude: f64, longitude: f64) -> JsValue {
    Array::of2(&JsValue::from_f64(latitude), &JsValue::from_f64(longitude)).into()
}
