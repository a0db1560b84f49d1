use crate::candidates::first_match;
use crate::config::MatchConfig;
use crate::hours::{DayMapping, Restaurant};
use crate::matcher::Matcher;
use crate::member::Member;
use wasm_bindgen::prelude::*;

fn matcher(sunday_first: bool) -> Matcher {
    Matcher::new(MatchConfig::new(if sunday_first {
        DayMapping::SUNDAY_FIRST
    } else {
        DayMapping::MONDAY_FIRST
    }))
}

/// `members`: `[{ id, schedule }]`, `restaurant`: `{ id, business_hours }`.
/// Resolves to `{ day, time }`, rejects with the error message.
#[wasm_bindgen(js_name = recommendMeeting)]
pub fn recommend_meeting(
    members: JsValue,
    restaurant: JsValue,
    sunday_first: bool,
) -> Result<JsValue, JsValue> {
    let members: Vec<Member> = serde_wasm_bindgen::from_value(members)?;
    let restaurant: Restaurant = serde_wasm_bindgen::from_value(restaurant)?;

    let recommendation = matcher(sunday_first)
        .recommend(&members, &restaurant)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(serde_wasm_bindgen::to_value(&recommendation)?)
}

/// Like `recommendMeeting`, over a list of restaurants in preference order.
/// Resolves to the first restaurant that works along with the skipped ones.
#[wasm_bindgen(js_name = recommendAmong)]
pub fn recommend_among(
    members: JsValue,
    restaurants: JsValue,
    sunday_first: bool,
) -> Result<JsValue, JsValue> {
    let members: Vec<Member> = serde_wasm_bindgen::from_value(members)?;
    let restaurants: Vec<Restaurant> = serde_wasm_bindgen::from_value(restaurants)?;

    let found = first_match(&matcher(sunday_first), &members, &restaurants)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(serde_wasm_bindgen::to_value(&found)?)
}
