use crate::obj::VertexLayout;

const GLOBALS: &str = r#"
struct GlobalUniform {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    sky_view: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    specular: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;
"#;

const OBJECT: &str = r#"
struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
}

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

fn normal_matrix() -> mat3x3<f32> {
    return mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    );
}

fn phong(normal: vec3<f32>, world_pos: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(globals.light_position.xyz - world_pos);
    let light_color = globals.light_color.rgb;
    let diffuse = max(dot(normal, light_dir), 0.0) * light_color;
    let ambient = globals.ambient.rgb * globals.ambient.w;

    let view_dir = normalize(globals.camera_position.xyz - world_pos);
    let reflect_dir = reflect(-light_dir, normal);
    let highlight = pow(max(dot(reflect_dir, view_dir), 0.0), globals.specular.y);
    let specular = highlight * globals.specular.x * light_color;

    return ambient + diffuse + specular;
}
"#;

const MATERIAL: &str = r#"
@group(2) @binding(0)
var diffuse_texture: texture_2d<f32>;
@group(2) @binding(1)
var normal_texture: texture_2d<f32>;
@group(2) @binding(2)
var material_sampler: sampler;
"#;

const FLAT: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.projection * globals.view * object.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return object.color;
}
"#;

const TEXTURED: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.projection * globals.view * world_position;
    out.world_pos = world_position.xyz;
    out.normal = normalize(normal_matrix() * input.normal);
    out.uv = input.uv;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(diffuse_texture, material_sampler, input.uv);
    if base.a < 0.1 {
        discard;
    }
    let lit = phong(normalize(input.normal), input.world_pos);
    return vec4<f32>(lit * base.rgb * object.color.rgb, base.a * object.color.a);
}
"#;

const NORMAL_MAPPED: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) tangent: vec3<f32>,
    @location(4) bitangent: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) tangent: vec3<f32>,
    @location(3) bitangent: vec3<f32>,
    @location(4) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    let normal_mat = normal_matrix();
    out.position = globals.projection * globals.view * world_position;
    out.world_pos = world_position.xyz;
    out.uv = input.uv;
    out.tangent = normalize(normal_mat * input.tangent);
    out.bitangent = normalize(normal_mat * input.bitangent);
    out.normal = normalize(normal_mat * input.normal);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    // Implicit-derivative sampling must happen before the discard.
    let base = textureSample(diffuse_texture, material_sampler, input.uv);
    let sampled = textureSample(normal_texture, material_sampler, input.uv).rgb * 2.0 - 1.0;
    if base.a < 0.1 {
        discard;
    }
    let tbn = mat3x3<f32>(
        normalize(input.tangent),
        normalize(input.bitangent),
        normalize(input.normal)
    );
    let normal = normalize(tbn * sampled);
    let lit = phong(normal, input.world_pos);
    return vec4<f32>(lit * base.rgb * object.color.rgb, base.a * object.color.a);
}
"#;

const SKYBOX: &str = r#"
@group(1) @binding(0)
var sky_texture: texture_cube<f32>;
@group(1) @binding(1)
var sky_sampler: sampler;

struct SkyOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) direction: vec3<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> SkyOutput {
    var out: SkyOutput;
    let clip = globals.projection * globals.sky_view * vec4<f32>(position, 1.0);
    // Pin the cube to the far plane.
    out.position = clip.xyww;
    out.direction = position;
    return out;
}

@fragment
fn fs_main(input: SkyOutput) -> @location(0) vec4<f32> {
    return textureSample(sky_texture, sky_sampler, input.direction);
}
"#;

/// WGSL source for the model pipeline of a vertex layout.
pub(crate) fn model_shader(layout: VertexLayout) -> String {
    match layout {
        VertexLayout::Position => [GLOBALS, OBJECT, FLAT].concat(),
        VertexLayout::PositionNormalUv => [GLOBALS, OBJECT, MATERIAL, TEXTURED].concat(),
        VertexLayout::PositionNormalUvTangent => {
            [GLOBALS, OBJECT, MATERIAL, NORMAL_MAPPED].concat()
        }
    }
}

pub(crate) fn skybox_shader() -> String {
    [GLOBALS, SKYBOX].concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textured_layouts_declare_material_bindings() {
        assert!(!model_shader(VertexLayout::Position).contains("@group(2)"));
        assert!(model_shader(VertexLayout::PositionNormalUv).contains("diffuse_texture"));
        let normal = model_shader(VertexLayout::PositionNormalUvTangent);
        assert!(normal.contains("@location(4) bitangent"));
        assert!(normal.contains("normal_texture, material_sampler"));
    }

    fn validate(source: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|err| panic!("{}", err.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|err| panic!("{err:?}"));
    }

    #[test]
    fn every_shader_passes_validation() {
        for layout in [
            VertexLayout::Position,
            VertexLayout::PositionNormalUv,
            VertexLayout::PositionNormalUvTangent,
        ] {
            validate(&model_shader(layout));
        }
        validate(&skybox_shader());
    }

    #[test]
    fn skybox_has_no_object_uniform() {
        let source = skybox_shader();
        assert!(source.contains("texture_cube"));
        assert!(!source.contains("ObjectConstants"));
    }
}
