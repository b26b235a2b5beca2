// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP proxies using wiremock.

use shelly_automation::automation::{Day, Location, SunTimesClient};
use shelly_automation::dimmer::{DimmerTarget, LegacyDimmer, RemoteDimmer, RpcDimmer};
use shelly_automation::types::{Brightness, DimDirection, FadeRate, RgbColor};
use shelly_automation::{Device, Error, ProtocolError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Gen2 light proxy
// ============================================================================

mod rpc_dimmer {
    use super::*;

    fn dimmer(server: &MockServer, id: u8) -> RpcDimmer<shelly_automation::HttpClient> {
        RpcDimmer::new(Device::http(server.uri()).unwrap(), id)
    }

    #[tokio::test]
    async fn toggle_targets_light_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.Toggle"))
            .and(query_param("id", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "was_on": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        dimmer(&server, 1).toggle().await.unwrap();
    }

    #[tokio::test]
    async fn dim_down_carries_fade_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.DimDown"))
            .and(query_param("id", "0"))
            .and(query_param("fade_rate", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        dimmer(&server, 0)
            .dim(DimDirection::Down, FadeRate::new(3).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn set_max_brightness() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.Set"))
            .and(query_param("id", "0"))
            .and(query_param("brightness", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        dimmer(&server, 0)
            .set_brightness(Brightness::MAX)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn brightness_is_read_from_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.GetStatus"))
            .and(query_param("id", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 0,
                "source": "http",
                "output": true,
                "brightness": 42,
                "temperature": {"tC": 41.2, "tF": 106.1}
            })))
            .mount(&server)
            .await;

        let brightness = dimmer(&server, 0).brightness().await.unwrap();
        assert_eq!(brightness.value(), 42);
    }

    #[tokio::test]
    async fn rpc_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.Toggle"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "code": 404,
                "message": "No handler for Light.Toggle"
            })))
            .mount(&server)
            .await;

        let err = dimmer(&server, 3).toggle().await.unwrap_err();
        match err {
            Error::Protocol(ProtocolError::Rejected { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("No handler"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn target_builds_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.DimStop"))
            .and(query_param("id", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        let target = DimmerTarget::new(server.uri(), 2);
        target.rpc_dimmer().unwrap().dim_stop().await.unwrap();
    }
}

// ============================================================================
// Gen1 light proxy
// ============================================================================

mod legacy_dimmer {
    use super::*;

    #[tokio::test]
    async fn initialize_writes_fade_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings"))
            .and(query_param("fade_rate", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "fade_rate": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dimmer = LegacyDimmer::new(
            Device::http(server.uri()).unwrap(),
            0,
            FadeRate::new(2).unwrap(),
        );
        dimmer.initialize().await.unwrap();
    }

    #[tokio::test]
    async fn dim_uses_full_step() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/light/1"))
            .and(query_param("dim", "up"))
            .and(query_param("step", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ison": true,
                "brightness": 30
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dimmer = LegacyDimmer::new(Device::http(server.uri()).unwrap(), 1, FadeRate::SLOWEST);
        dimmer.dim(DimDirection::Up, FadeRate::FASTEST).await.unwrap();
    }

    #[tokio::test]
    async fn brightness_is_read_from_light_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/light/0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ison": true,
                "source": "http",
                "has_timer": false,
                "mode": "white",
                "brightness": 1
            })))
            .mount(&server)
            .await;

        let dimmer = LegacyDimmer::new(Device::http(server.uri()).unwrap(), 0, FadeRate::SLOWEST);
        assert!(dimmer.brightness().await.unwrap().is_sweep_floor());
    }
}

// ============================================================================
// Other device calls
// ============================================================================

mod device_calls {
    use super::*;

    #[tokio::test]
    async fn switch_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Switch.Set"))
            .and(query_param("id", "0"))
            .and(query_param("on", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "was_on": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        Device::http(server.uri())
            .unwrap()
            .set_switch(0, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rgbw_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/RGBW.GetStatus"))
            .and(query_param("id", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 0,
                "source": "init",
                "output": true,
                "rgb": [0, 0, 255],
                "brightness": 80,
                "white": 0
            })))
            .mount(&server)
            .await;

        let status = Device::http(server.uri()).unwrap().rgbw_status(0).await.unwrap();
        assert_eq!(status.rgb(), RgbColor::BLUE);
        assert_eq!(status.brightness().value(), 80);
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rpc/Light.GetStatus"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = Device::http(server.uri())
            .unwrap()
            .light_status(0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}

// ============================================================================
// Sun times service
// ============================================================================

mod sun_times {
    use super::*;

    fn location() -> Location {
        Location {
            latitude: 51.2362,
            longitude: -0.5704,
            time_zone: "Europe/London".to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_parses_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .and(query_param("formatted", "0"))
            .and(query_param("tzid", "Europe/London"))
            .and(query_param("date", "today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": {
                    "sunrise": "2024-05-01T05:32:00+01:00",
                    "sunset": "2024-05-01T20:31:00+01:00",
                    "solar_noon": "2024-05-01T13:01:00+01:00",
                    "day_length": 53940,
                    "civil_twilight_begin": "2024-05-01T04:56:00+01:00",
                    "civil_twilight_end": "2024-05-01T21:08:00+01:00",
                    "nautical_twilight_begin": "2024-05-01T04:10:00+01:00",
                    "nautical_twilight_end": "2024-05-01T21:54:00+01:00",
                    "astronomical_twilight_begin": "2024-05-01T03:12:00+01:00",
                    "astronomical_twilight_end": "2024-05-01T22:52:00+01:00"
                },
                "status": "OK",
                "tzid": "Europe/London"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SunTimesClient::with_base_url(server.uri()).unwrap();
        let times = client.fetch(&location(), Day::Today).await.unwrap();
        assert_eq!(times.sunrise().to_rfc3339(), "2024-05-01T05:32:00+01:00");
    }

    #[tokio::test]
    async fn service_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": "",
                "status": "INVALID_TZID"
            })))
            .mount(&server)
            .await;

        let client = SunTimesClient::with_base_url(server.uri()).unwrap();
        let err = client.fetch(&location(), Day::Tomorrow).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn http_failure_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SunTimesClient::with_base_url(server.uri()).unwrap();
        let err = client.fetch(&location(), Day::Today).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::Rejected { status: 503, .. })
        ));
    }
}
