//! Common test fixtures for geoserver-map tests.
//!
//! Response bodies are trimmed copies of what GeoServer 2.x returns, so
//! parsers are tested against real document shapes.

/// WFS GetFeature responses in GML2.
pub mod gml {
    /// One `topp:poi` feature with a Point geometry inside `the_geom`.
    pub const SINGLE_POINT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:topp="http://www.openplans.org/topp">
  <gml:boundedBy>
    <gml:Box srsName="http://www.opengis.net/gml/srs/epsg.xml#4326">
      <gml:coordinates decimal="." cs="," ts=" ">10,20 10,20</gml:coordinates>
    </gml:Box>
  </gml:boundedBy>
  <gml:featureMember>
    <topp:poi fid="poi.1">
      <topp:the_geom>
        <gml:Point srsName="http://www.opengis.net/gml/srs/epsg.xml#4326">
          <gml:coordinates decimal="." cs="," ts=" ">10,20</gml:coordinates>
        </gml:Point>
      </topp:the_geom>
      <topp:NAME>museam</topp:NAME>
      <topp:THUMBNAIL>pics/22037827-Ti.jpg</topp:THUMBNAIL>
    </topp:poi>
  </gml:featureMember>
</wfs:FeatureCollection>"#;

    /// Two points in separate members, then one member holding two features.
    pub const MANY_POINTS: &str = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:tiger="http://www.census.gov">
  <gml:featureMember>
    <tiger:poi fid="poi.1"><tiger:the_geom><gml:Point><gml:coordinates>-74.0104611,40.70758763</gml:coordinates></gml:Point></tiger:the_geom><tiger:NAME>museam</tiger:NAME></tiger:poi>
  </gml:featureMember>
  <gml:featureMember>
    <tiger:poi fid="poi.2"><tiger:the_geom><gml:Point><gml:coordinates>-74.008387,40.711152</gml:coordinates></gml:Point></tiger:the_geom><tiger:NAME>stock</tiger:NAME></tiger:poi>
  </gml:featureMember>
  <gml:featureMember>
    <tiger:poi fid="poi.3"><tiger:the_geom><gml:Point><gml:coordinates>-74.0,40.7</gml:coordinates></gml:Point></tiger:the_geom></tiger:poi>
    <tiger:poi fid="poi.4"><tiger:the_geom><gml:Point><gml:coordinates>-73.9,40.8</gml:coordinates></gml:Point></tiger:the_geom></tiger:poi>
  </gml:featureMember>
</wfs:FeatureCollection>"#;

    /// A single feature whose only geometry is a LineString.
    pub const LINESTRING_ONLY: &str = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:tiger="http://www.census.gov">
  <gml:featureMember>
    <tiger:tiger_roads fid="tiger_roads.7672">
      <tiger:the_geom>
        <gml:LineString><gml:coordinates>-74.02,40.71 -74.01,40.72</gml:coordinates></gml:LineString>
      </tiger:the_geom>
      <tiger:CFCC>A41</tiger:CFCC>
      <tiger:NAME>Broad St</tiger:NAME>
    </tiger:tiger_roads>
  </gml:featureMember>
</wfs:FeatureCollection>"#;

    /// A Point feature next to a Polygon feature.
    pub const MIXED_GEOMETRIES: &str = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:ws="urn:ws">
  <gml:featureMember>
    <ws:site fid="site.1"><ws:geom><gml:Point><gml:coordinates>1,2</gml:coordinates></gml:Point></ws:geom><ws:label>kept</ws:label></ws:site>
  </gml:featureMember>
  <gml:featureMember>
    <ws:site fid="site.2"><ws:geom><gml:Polygon><gml:outerBoundaryIs><gml:LinearRing><gml:coordinates>0,0 1,0 1,1 0,0</gml:coordinates></gml:LinearRing></gml:outerBoundaryIs></gml:Polygon></ws:geom><ws:label>dropped</ws:label></ws:site>
  </gml:featureMember>
</wfs:FeatureCollection>"#;

    /// Unprefixed dialect emitted by some servers.
    pub const UNPREFIXED: &str = r#"<FeatureCollection>
  <featureMember>
    <poi><gml:Point><gml:coordinates>5,6</gml:coordinates></gml:Point><name>plain</name></poi>
  </featureMember>
</FeatureCollection>"#;

    /// A collection without any members.
    pub const EMPTY: &str = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml"/>"#;

    /// Closing tag missing for the feature element.
    pub const MALFORMED: &str = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml">
  <gml:featureMember><ws:poi></gml:featureMember>
</wfs:FeatureCollection>"#;
}

/// WMS and WFS GetCapabilities responses.
pub mod capabilities {
    /// WMS 1.1.1 with two named layers under the root layer.
    pub const WMS_111: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WMT_MS_Capabilities SYSTEM "http://localhost:8080/geoserver/schemas/wms/1.1.1/WMS_MS_Capabilities.dtd">
<WMT_MS_Capabilities version="1.1.1" updateSequence="142">
  <Service>
    <Name>OGC:WMS</Name>
    <Title>City GeoServer</Title>
    <Abstract>Municipal layers</Abstract>
  </Service>
  <Capability>
    <Request/>
    <Layer>
      <Title>GeoServer Web Map Service</Title>
      <SRS>EPSG:4326</SRS>
      <Layer queryable="1">
        <Name>topp:states</Name>
        <Title>USA Population</Title>
        <Abstract>This is some census data on the states.</Abstract>
        <SRS>EPSG:4326</SRS>
        <SRS>EPSG:3857</SRS>
        <LatLonBoundingBox minx="-124.731422" miny="24.955967" maxx="-66.969849" maxy="49.371735"/>
        <Style><Name>population</Name><Title>Population in the United States</Title></Style>
        <Style><Name>pophatch</Name></Style>
      </Layer>
      <Layer queryable="0">
        <Name>nurc:Img_Sample</Name>
        <SRS>EPSG:4326</SRS>
      </Layer>
    </Layer>
  </Capability>
</WMT_MS_Capabilities>"#;

    /// WMS 1.3.0 with exactly one named layer and no SRS or service title.
    pub const WMS_130_SINGLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms" xmlns:xlink="http://www.w3.org/1999/xlink">
  <Service><Name>WMS</Name></Service>
  <Capability>
    <Layer>
      <Title>root</Title>
      <Layer queryable="1">
        <Name>ws:roads</Name>
        <EX_GeographicBoundingBox>
          <westBoundLongitude>19.8</westBoundLongitude>
          <eastBoundLongitude>20.2</eastBoundLongitude>
          <southBoundLatitude>49.9</southBoundLatitude>
          <northBoundLatitude>50.2</northBoundLatitude>
        </EX_GeographicBoundingBox>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

    /// WMS 1.3.0 layer advertising CRS elements and no bounding box.
    pub const WMS_130_CRS: &str = r#"<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Service><Title>Tiles</Title></Service>
  <Capability>
    <Layer>
      <Layer><Name>ws:parcels</Name><Title>Parcels</Title><CRS>EPSG:2180</CRS><CRS>CRS:84</CRS></Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

    /// WFS 2.0.0 document mixing `ows:` and default-namespace elements.
    pub const WFS_200: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:WFS_Capabilities version="2.0.0" xmlns="http://www.opengis.net/wfs/2.0" xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:ows="http://www.opengis.net/ows/1.1">
  <ows:ServiceIdentification>
    <ows:Title>City WFS</ows:Title>
    <ows:Abstract>Vector layers</ows:Abstract>
  </ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetCapabilities"/>
    <ows:Operation name="DescribeFeatureType"/>
    <ows:Operation name="GetFeature"/>
  </ows:OperationsMetadata>
  <FeatureTypeList>
    <FeatureType xmlns:topp="http://www.openplans.org/topp">
      <Name>topp:states</Name>
      <Title>USA Population</Title>
      <Abstract>Census data</Abstract>
      <ows:Keywords>
        <ows:Keyword>census</ows:Keyword>
        <ows:Keyword>states</ows:Keyword>
      </ows:Keywords>
      <DefaultCRS>urn:ogc:def:crs:EPSG::4326</DefaultCRS>
      <OtherCRS>urn:ogc:def:crs:EPSG::3857</OtherCRS>
      <OutputFormats>
        <Format>application/gml+xml; version=3.2</Format>
        <Format>application/json</Format>
      </OutputFormats>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>-124.731422 24.955967</ows:LowerCorner>
        <ows:UpperCorner>-66.969849 49.371735</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </FeatureType>
    <FeatureType xmlns:tiger="http://www.census.gov">
      <Name>tiger:roads</Name>
      <DefaultCRS>urn:ogc:def:crs:EPSG::4326</DefaultCRS>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>-74.02722 not-a-number</ows:LowerCorner>
        <ows:UpperCorner>-73.907005 40.798952</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </FeatureType>
    <FeatureType>
      <Title>Unnamed</Title>
    </FeatureType>
  </FeatureTypeList>
</wfs:WFS_Capabilities>"#;

    /// WFS 1.0.0 document with `SRS`, comma-separated keywords and a
    /// `LatLongBoundingBox`.
    pub const WFS_100: &str = r#"<WFS_Capabilities version="1.0.0" xmlns="http://www.opengis.net/wfs">
  <Service><Name>WFS</Name><Title>Legacy WFS</Title></Service>
  <Capability>
    <Request><GetCapabilities/><DescribeFeatureType/><GetFeature/></Request>
  </Capability>
  <FeatureTypeList>
    <FeatureType>
      <Name>tiger:poi</Name>
      <Keywords>poi, Manhattan, DS_poi</Keywords>
      <SRS>EPSG:4326</SRS>
      <LatLongBoundingBox minx="-74.0118" miny="40.7075" maxx="-74.0015" maxy="40.7198"/>
    </FeatureType>
  </FeatureTypeList>
</WFS_Capabilities>"#;
}

/// OGC exception documents returned with HTTP 200.
pub mod exceptions {
    pub const SERVICE_EXCEPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.2.0" xmlns="http://www.opengis.net/ogc">
  <ServiceException code="InvalidParameterValue" locator="typeName">
      Feature type ws:missing unknown
  </ServiceException>
</ServiceExceptionReport>"#;

    pub const OWS_EXCEPTION: &str = r#"<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows" version="1.0.0">
  <ows:Exception exceptionCode="NoApplicableCode">
    <ows:ExceptionText>Could not find output format application/json</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;
}

/// WFS GetFeature responses in GeoJSON.
pub mod geojson {
    /// GeoServer-style collection with one polygon and foreign members.
    pub const STATES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "states.1",
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-88.0, 37.0], [-87.5, 37.0], [-87.5, 38.0], [-88.0, 37.0]]]
      },
      "geometry_name": "the_geom",
      "properties": {"STATE_NAME": "Illinois", "PERSONS": 11430602}
    }
  ],
  "totalFeatures": 1,
  "numberMatched": 1,
  "numberReturned": 1,
  "timeStamp": "2024-01-15T12:00:00.000Z",
  "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4326"}}
}"#;

    pub const EMPTY: &str = r#"{"type":"FeatureCollection","features":[]}"#;

    /// JSON error body some deployments return with HTTP 200.
    pub const ERROR_BODY: &str = r#"{"error":"bad request"}"#;

    /// HTML error page returned with HTTP 200 for an unsupported format.
    pub const HTML_PAGE: &str =
        "<html><head><title>Error</title></head><body>Unsupported output format</body></html>";
}
