use std::borrow::Cow;

use egui_wgpu::wgpu;

const MESH_WGSL: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    camera_pos: vec3<f32>,
    _pad0: f32,
    ambient: vec3<f32>,
    _pad1: f32,
    light_dir: vec3<f32>,
    _pad2: f32,
    light_color: vec3<f32>,
    _pad3: f32,
    // x: mode (0 normal, 1 unlit, 2 lit), y: roughness, z: directional on, w: target is srgb
    material_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var base_tex: texture_2d<f32>;

@group(1) @binding(1)
var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = uniforms.model * vec4<f32>(input.position, 1.0);
    out.world_pos = world.xyz;
    out.normal = (uniforms.normal_matrix * vec4<f32>(input.normal, 0.0)).xyz;
    out.uv = input.uv;
    out.position = uniforms.view_proj * world;
    return out;
}

fn linear_to_srgb(c: vec3<f32>) -> vec3<f32> {
    let cutoff = c < vec3<f32>(0.0031308);
    let lower = c * 12.92;
    let higher = 1.055 * pow(c, vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(higher, lower, cutoff);
}

fn srgb_to_linear(c: vec3<f32>) -> vec3<f32> {
    let cutoff = c < vec3<f32>(0.04045);
    let lower = c / 12.92;
    let higher = pow((c + 0.055) / 1.055, vec3<f32>(2.4));
    return select(higher, lower, cutoff);
}

fn shade_lit(albedo: vec3<f32>, normal: vec3<f32>, world_pos: vec3<f32>) -> vec3<f32> {
    let n = normalize(normal);
    var color = albedo * uniforms.ambient;
    if uniforms.material_params.z >= 0.5 {
        let l = normalize(uniforms.light_dir);
        let v = normalize(uniforms.camera_pos - world_pos);
        let h = normalize(l + v);
        let roughness = clamp(uniforms.material_params.y, 0.0, 1.0);
        let ndotl = max(dot(n, l), 0.0);
        let shininess = mix(64.0, 4.0, roughness);
        let spec = pow(max(dot(n, h), 0.0), shininess) * (1.0 - roughness) * 0.25 * ndotl;
        color = color + (albedo * ndotl + vec3<f32>(spec)) * uniforms.light_color;
    }
    return color;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let mode = i32(uniforms.material_params.x + 0.5);
    var display: vec3<f32>;
    if mode == 0 {
        let view_normal = normalize((uniforms.view * vec4<f32>(normalize(input.normal), 0.0)).xyz);
        display = view_normal * 0.5 + vec3<f32>(0.5);
    } else {
        let albedo = textureSample(base_tex, base_sampler, input.uv).rgb;
        if mode == 1 {
            display = linear_to_srgb(albedo);
        } else {
            display = linear_to_srgb(shade_lit(albedo, input.normal, input.world_pos));
        }
    }
    if uniforms.material_params.w >= 0.5 {
        return vec4<f32>(srgb_to_linear(display), 1.0);
    }
    return vec4<f32>(display, 1.0);
}
"#;

const BLIT_WGSL: &str = r#"
@group(0) @binding(0)
var blit_tex: texture_2d<f32>;

@group(0) @binding(1)
var blit_sampler: sampler;

struct BlitOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(@builtin(vertex_index) index: u32) -> BlitOut {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );
    var out: BlitOut;
    out.position = vec4<f32>(positions[index], 0.0, 1.0);
    out.uv = uvs[index];
    return out;
}

@fragment
fn fs_blit(input: BlitOut) -> @location(0) vec4<f32> {
    return textureSample(blit_tex, blit_sampler, input.uv);
}
"#;

pub(super) fn create_mesh_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("solido_viewport_shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(MESH_WGSL)),
    })
}

pub(super) fn create_blit_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("solido_viewport_blit"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(BLIT_WGSL)),
    })
}
