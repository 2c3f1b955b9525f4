//! Household topology as reported by `GetZoneGroupState`
//!
//! The topology arrives as an XML document embedded (escaped) inside the
//! SOAP response. Only the attributes needed to address each group's
//! coordinator are kept; everything else is ignored on deserialization.

use serde::Deserialize;

use crate::ApiError;

/// Decoded `ZoneGroupState` document
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneGroupState {
    #[serde(rename = "ZoneGroups")]
    pub zone_groups: ZoneGroups,
}

/// All zone groups in the household
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneGroups {
    #[serde(rename = "ZoneGroup", default)]
    pub groups: Vec<ZoneGroup>,
}

/// Players currently playing in sync under one coordinator
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneGroup {
    #[serde(rename = "@Coordinator")]
    pub coordinator: String,

    #[serde(rename = "@ID")]
    pub id: String,

    #[serde(rename = "ZoneGroupMember", default)]
    pub members: Vec<ZoneGroupMember>,
}

/// One player in a zone group
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneGroupMember {
    #[serde(rename = "@UUID")]
    pub uuid: String,

    /// Device description URL, e.g. `http://192.168.1.10:1400/xml/device_description.xml`
    #[serde(rename = "@Location")]
    pub location: String,

    #[serde(rename = "@ZoneName")]
    pub zone_name: String,

    /// `"1"` for players hidden from the user (bonded subs, surrounds)
    #[serde(rename = "@Invisible", default)]
    pub invisible: Option<String>,
}

impl ZoneGroupState {
    /// Parse the decoded topology document
    ///
    /// Newer firmware wraps the groups in `<ZoneGroupState>`, older firmware
    /// returns `<ZoneGroups>` as the root; both are accepted.
    pub fn from_xml(xml: &str) -> Result<Self, ApiError> {
        match quick_xml::de::from_str::<ZoneGroupState>(xml) {
            Ok(state) => Ok(state),
            Err(wrapped_err) => quick_xml::de::from_str::<ZoneGroups>(xml)
                .map(|zone_groups| ZoneGroupState { zone_groups })
                .map_err(|_| {
                    ApiError::ParseError(format!("Invalid ZoneGroupState: {}", wrapped_err))
                }),
        }
    }
}

impl ZoneGroup {
    /// The member acting as coordinator, if it is listed
    pub fn coordinator_member(&self) -> Option<&ZoneGroupMember> {
        self.members.iter().find(|m| m.uuid == self.coordinator)
    }

    /// Members the user can see in the Sonos app
    pub fn visible_members(&self) -> impl Iterator<Item = &ZoneGroupMember> {
        self.members.iter().filter(|m| m.is_visible())
    }
}

impl ZoneGroupMember {
    pub fn is_visible(&self) -> bool {
        self.invisible.as_deref() != Some("1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSEHOLD: &str = r#"<ZoneGroupState>
  <ZoneGroups>
    <ZoneGroup Coordinator="RINCON_LIVING" ID="RINCON_LIVING:12">
      <ZoneGroupMember UUID="RINCON_LIVING" Location="http://192.168.1.10:1400/xml/device_description.xml" ZoneName="Living Room" SoftwareVersion="79.1-52020">
        <Satellite UUID="RINCON_SUB" Location="http://192.168.1.13:1400/xml/device_description.xml" ZoneName="Living Room" Invisible="1"/>
      </ZoneGroupMember>
      <ZoneGroupMember UUID="RINCON_KITCHEN" Location="http://192.168.1.11:1400/xml/device_description.xml" ZoneName="Kitchen"/>
      <ZoneGroupMember UUID="RINCON_BRIDGE" Location="http://192.168.1.12:1400/xml/device_description.xml" ZoneName="BRIDGE" Invisible="1"/>
    </ZoneGroup>
    <ZoneGroup Coordinator="RINCON_OFFICE" ID="RINCON_OFFICE:3">
      <ZoneGroupMember UUID="RINCON_OFFICE" Location="http://192.168.1.20:1400/xml/device_description.xml" ZoneName="Office"/>
    </ZoneGroup>
  </ZoneGroups>
  <VanishedDevices/>
</ZoneGroupState>"#;

    #[test]
    fn test_parse_household() {
        let state = ZoneGroupState::from_xml(HOUSEHOLD).unwrap();
        let groups = &state.zone_groups.groups;
        assert_eq!(groups.len(), 2);

        let living = &groups[0];
        assert_eq!(living.id, "RINCON_LIVING:12");
        assert_eq!(living.members.len(), 3);
        assert_eq!(living.visible_members().count(), 2);
        assert_eq!(
            living.coordinator_member().map(|m| m.zone_name.as_str()),
            Some("Living Room")
        );
    }

    #[test]
    fn test_parse_legacy_root() {
        let legacy = r#"<ZoneGroups><ZoneGroup Coordinator="RINCON_A" ID="RINCON_A:1"><ZoneGroupMember UUID="RINCON_A" Location="http://10.0.0.2:1400/xml/device_description.xml" ZoneName="Den"/></ZoneGroup></ZoneGroups>"#;
        let state = ZoneGroupState::from_xml(legacy).unwrap();
        assert_eq!(state.zone_groups.groups[0].members[0].zone_name, "Den");
    }

    #[test]
    fn test_missing_coordinator_member() {
        let xml = r#"<ZoneGroupState><ZoneGroups><ZoneGroup Coordinator="RINCON_GONE" ID="x"><ZoneGroupMember UUID="RINCON_A" Location="http://10.0.0.2:1400/" ZoneName="Den"/></ZoneGroup></ZoneGroups></ZoneGroupState>"#;
        let state = ZoneGroupState::from_xml(xml).unwrap();
        assert!(state.zone_groups.groups[0].coordinator_member().is_none());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            ZoneGroupState::from_xml("not xml at all"),
            Err(ApiError::ParseError(_))
        ));
    }
}
