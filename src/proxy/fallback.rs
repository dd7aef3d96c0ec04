//! Canned payloads served when an upstream call fails.
//!
//! Each document mimics the shape the front-end expects from the real
//! API. Only the timestamp and the configured location vary; everything
//! else is constant so the UI renders the same sample data every time.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

use crate::config::model::{MockLocation, UpstreamKind};

/// Offset applied to place the second sample vehicle and traffic point.
const SECOND_POINT_OFFSET: f64 = 0.01;

/// Observation time baked into the weather sample (2022-01-01T00:00:00Z).
const WEATHER_OBSERVED_AT: u64 = 1_640_995_200;

#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[must_use]
pub fn payload(kind: UpstreamKind, location: &MockLocation, now: u64) -> Value {
    match kind {
        UpstreamKind::Swiftly => vehicle_feed(location, now),
        UpstreamKind::Weather => weather_observation(location),
        UpstreamKind::Tomtom => traffic_flow(location),
    }
}

/// GTFS-realtime vehicle positions feed with two trains.
#[must_use]
pub fn vehicle_feed(location: &MockLocation, now: u64) -> Value {
    json!({
        "header": {
            "gtfs_realtime_version": "2.0",
            "timestamp": now
        },
        "entity": [
            {
                "id": "vehicle_001",
                "vehicle": {
                    "trip": {
                        "trip_id": "trip_red_line_001",
                        "route_id": "red",
                        "direction_id": 0
                    },
                    "vehicle": {
                        "id": "red_001",
                        "label": "Red Line Train 1"
                    },
                    "position": {
                        "latitude": location.lat,
                        "longitude": location.lon
                    },
                    "timestamp": now,
                    "congestion_level": 0,
                    "occupancy_status": 1
                }
            },
            {
                "id": "vehicle_002",
                "vehicle": {
                    "trip": {
                        "trip_id": "trip_blue_line_001",
                        "route_id": "blue",
                        "direction_id": 1
                    },
                    "vehicle": {
                        "id": "blue_001",
                        "label": "Blue Line Train 1"
                    },
                    "position": {
                        "latitude": location.lat + SECOND_POINT_OFFSET,
                        "longitude": location.lon - SECOND_POINT_OFFSET
                    },
                    "timestamp": now,
                    "congestion_level": 1,
                    "occupancy_status": 2
                }
            }
        ]
    })
}

/// OpenWeatherMap current-weather document, imperial units.
#[must_use]
pub fn weather_observation(location: &MockLocation) -> Value {
    json!({
        "coord": {
            "lon": location.lon,
            "lat": location.lat
        },
        "weather": [
            {
                "id": 800,
                "main": "Clear",
                "description": "clear sky",
                "icon": "01d"
            }
        ],
        "base": "stations",
        "main": {
            "temp": 72.5,
            "feels_like": 70.2,
            "temp_min": 68.0,
            "temp_max": 78.0,
            "pressure": 1013,
            "humidity": 45
        },
        "visibility": 10000,
        "wind": {
            "speed": 5.2,
            "deg": 280
        },
        "clouds": {
            "all": 10
        },
        "dt": WEATHER_OBSERVED_AT,
        "sys": {
            "type": 2,
            "id": 2_000_314,
            "country": "US",
            "sunrise": 1_640_952_000,
            "sunset": 1_640_988_000
        },
        "timezone": -28800,
        "id": 5_368_361,
        "name": location.city,
        "cod": 200
    })
}

/// TomTom flow segment plus a single road closure.
#[must_use]
pub fn traffic_flow(location: &MockLocation) -> Value {
    json!({
        "flowSegmentData": {
            "frc": "FRC3",
            "currentSpeed": 35,
            "freeFlowSpeed": 45,
            "currentTravelTime": 120,
            "freeFlowTravelTime": 95,
            "confidence": 0.85,
            "roadClosure": false,
            "coordinates": {
                "coordinate": [
                    {
                        "latitude": location.lat,
                        "longitude": location.lon
                    },
                    {
                        "latitude": location.lat + SECOND_POINT_OFFSET,
                        "longitude": location.lon - SECOND_POINT_OFFSET
                    }
                ]
            }
        },
        "incidents": {
            "incident": [
                {
                    "id": "incident_001",
                    "type": "ROAD_CLOSURE",
                    "severity": "MEDIUM",
                    "location": {
                        "latitude": location.lat,
                        "longitude": location.lon
                    },
                    "description": "Construction work in progress"
                }
            ]
        }
    })
}
